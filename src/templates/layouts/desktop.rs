use maud::{html, Markup, PreEscaped, DOCTYPE};

// Reports are downloaded and opened offline, so styles are inlined.
const STYLE: &str = r#"
body { font-family: system-ui, sans-serif; max-width: 960px; margin: 0 auto; padding: 1rem 2rem; color: #1f2933; }
header { display: flex; align-items: center; justify-content: space-between; border-bottom: 2px solid #524ed2; margin-bottom: 1.5rem; }
header nav ul { display: flex; gap: 1rem; list-style: none; }
.card { border: 1px solid #d9dde3; border-radius: 8px; padding: 1rem 1.25rem; margin-bottom: 1.25rem; }
.comparable { display: flex; gap: 1rem; }
.comparable img { width: 220px; height: 150px; object-fit: cover; border-radius: 6px; }
.comparable pre { white-space: pre-wrap; font-family: inherit; margin: 0; }
table.grid { border-collapse: collapse; width: 100%; font-size: 0.9rem; }
table.grid th, table.grid td { border: 1px solid #d9dde3; padding: 0.35rem 0.5rem; text-align: left; }
table.grid tr.subject { background: #eef0ff; font-weight: 600; }
.band { font-size: 1.2rem; }
.notice { color: #9a3412; background: #fff7ed; border-left: 4px solid #f97316; padding: 0.5rem 0.75rem; }
"#;

pub fn desktop_layout(title: &str, content: Markup) -> Markup {
    html! {
        (DOCTYPE)
        html lang="en" {
            head {
                meta charset="utf-8";
                meta name="viewport" content="width=device-width, initial-scale=1.0";
                title { (title) }
                style { (PreEscaped(STYLE)) }
            }
            body {
                header {
                    h3 { "Comparable Market Analysis" }
                    nav {
                        ul {
                            li { a href="/" { "Home" } }
                            li { a href="/reports" { "Reports" } }
                        }
                    }
                }
                (content)
            }
        }
    }
}
