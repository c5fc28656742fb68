use crate::domain::model::MatchResult;

pub const INDEX_PAGE: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="utf-8">
  <title>Face Check</title>
  <style>
    body { font-family: sans-serif; max-width: 40rem; margin: 3rem auto; }
    label { display: block; margin-top: 1rem; }
    button { margin-top: 1.5rem; }
  </style>
</head>
<body>
  <h1>Face Check</h1>
  <p>Upload a photo and a name to compare it against image search results.</p>
  <form action="/verify" method="post" enctype="multipart/form-data">
    <label>Photo (png, jpg, jpeg)
      <input type="file" name="file" accept=".png,.jpg,.jpeg" required>
    </label>
    <label>Search query
      <input type="text" name="query" placeholder="e.g. john smith" required>
    </label>
    <button type="submit">Verify</button>
  </form>
</body>
</html>
"#;

pub fn escape_html(input: &str) -> String {
    let mut escaped = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#x27;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

fn match_row(result: &MatchResult) -> String {
    let image = escape_html(&result.image);
    format!(
        r#"    <tr class="{class}">
      <td><a href="{image}"><img src="{image}" alt="candidate" width="120"></a></td>
      <td><a href="{image}">{image}</a></td>
      <td>{verified}</td>
      <td>{distance:.4}</td>
    </tr>
"#,
        class = if result.verified { "match" } else { "no-match" },
        image = image,
        verified = if result.verified { "Yes" } else { "No" },
        distance = result.distance,
    )
}

pub fn results_page(query: &str, matches: &[MatchResult]) -> String {
    let body = if matches.is_empty() {
        "  <p>No candidate images could be compared.</p>\n".to_string()
    } else {
        let rows: String = matches.iter().map(match_row).collect();
        format!(
            "  <table>\n    <tr><th>Image</th><th>Source</th><th>Verified</th><th>Distance</th></tr>\n{}  </table>\n",
            rows
        )
    };

    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="utf-8">
  <title>Face Check Results</title>
  <style>
    body {{ font-family: sans-serif; max-width: 60rem; margin: 3rem auto; }}
    td, th {{ padding: 0.4rem 0.8rem; text-align: left; }}
    tr.match {{ background: #e6f4ea; }}
  </style>
</head>
<body>
  <h1>Results for "{query}"</h1>
{body}  <p><a href="/">Check another photo</a></p>
</body>
</html>
"#,
        query = escape_html(query),
        body = body,
    )
}
