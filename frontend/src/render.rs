//! Deployments panel rendering

use openapi_client::models::Deployment;
use openapi_server::html::escape_html;

/// Panel content when a project has no deployments
pub const NO_DEPLOYMENTS: &str = "No deployments yet.";

/// Transient notice shown while a deployment is being created
pub const CREATING_DEPLOYMENT: &str = r#"<p class="notice">Creating deployment...</p>"#;

/// Render the deployments panel; an empty or absent list renders the placeholder
pub fn render_deployments(deployments: Option<&[Deployment]>) -> String {
    match deployments {
        None | Some([]) => NO_DEPLOYMENTS.to_string(),
        Some(deployments) => {
            let items: Vec<String> = deployments.iter().map(render_deployment).collect();
            format!(r#"<ul class="deployments">{}</ul>"#, items.join(""))
        }
    }
}

fn render_deployment(deployment: &Deployment) -> String {
    let status = escape_html(deployment.status.as_str());

    let domains = if deployment.domains.is_empty() {
        format!(r#"<span class="domain">{}</span>"#, escape_html(&deployment.id))
    } else {
        deployment
            .domains
            .iter()
            .map(|domain| {
                let domain = escape_html(domain);
                format!(
                    r#"<a class="domain" href="https://{0}" target="_blank" rel="noopener">{0}</a>"#,
                    domain
                )
            })
            .collect::<Vec<_>>()
            .join(" ")
    };

    format!(
        r#"<li class="deployment status-{status}"><span class="status">{status}</span> {domains} <time datetime="{datetime}">{updated}</time></li>"#,
        status = status,
        domains = domains,
        datetime = deployment.updated_at.to_rfc3339(),
        updated = deployment.updated_at.format("%Y-%m-%d %H:%M:%S UTC"),
    )
}
