//! HTML page rendering

use openapi_client::models::Project;
use openapi_server::html::escape_html;

/// Script of the compiled browser controller
pub const FRONTEND_SCRIPT: &str = "/pkg/deploydash_frontend.js";

fn render_project_options(projects: &[Project]) -> String {
    projects
        .iter()
        .map(|project| {
            format!(
                r#"<option value="{}">{}</option>"#,
                escape_html(&project.id),
                escape_html(&project.name)
            )
        })
        .collect::<Vec<_>>()
        .join("\n          ")
}

/// Render the dashboard page with the given projects in the selector
pub fn render_index(projects: &[Project]) -> String {
    let options = render_project_options(projects);

    format!(
        r#"<!DOCTYPE html>
<html lang="en">
  <head>
    <meta charset="utf-8" />
    <meta name="viewport" content="width=device-width, initial-scale=1" />
    <title>deploydash</title>
    <link rel="stylesheet" href="/style.css" />
  </head>
  <body>
    <header>
      <h1>deploydash</h1>
      <form method="POST" action="/project" class="new-project">
        <input type="text" name="name" placeholder="New project name" />
        <button type="submit">Create project</button>
      </form>
    </header>
    <main>
      <section class="editor-pane">
        <div class="toolbar">
          <select id="project-select">
          {options}
          </select>
          <button id="deploy-button" type="button">Deploy</button>
        </div>
        <textarea id="editor" spellcheck="false"></textarea>
      </section>
      <section class="deployments-pane">
        <h2>Deployments</h2>
        <div id="deployments"></div>
      </section>
    </main>
    <script type="module">
      import init from "{script}";
      init();
    </script>
  </body>
</html>
"#,
        options = options,
        script = FRONTEND_SCRIPT,
    )
}
