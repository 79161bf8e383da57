//! Interactive login against a real provider.
//!
//! ```text
//! SOCIAL_PROVIDER=github SOCIAL_CLIENT_ID=... SOCIAL_CLIENT_SECRET=... \
//! SOCIAL_REDIRECT_URI=http://localhost:8080/callback cargo run --example login_flow
//! ```
//!
//! Open the printed URL, approve access, then paste the full callback URL
//! the browser was redirected to.

use std::collections::HashMap;
use std::env;
use std::io::{self, BufRead, Write};

use social_connect::auth::{generate_state, ProviderSettings, Service, ServiceConfig};
use url::Url;

fn required_var(name: &str) -> Result<String, Box<dyn std::error::Error>> {
    env::var(name).map_err(|_| format!("environment variable {name} is not set").into())
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let provider_name = env::var("SOCIAL_PROVIDER").unwrap_or_else(|_| "github".to_string());
    let scope: Vec<String> = env::var("SOCIAL_SCOPE")
        .map(|raw| raw.split_whitespace().map(str::to_owned).collect())
        .unwrap_or_default();

    let config = ServiceConfig::new()
        .with_redirect_uri(required_var("SOCIAL_REDIRECT_URI")?)
        .with_provider(
            &provider_name,
            ProviderSettings::new(
                required_var("SOCIAL_CLIENT_ID")?,
                required_var("SOCIAL_CLIENT_SECRET")?,
            )
            .with_scope(scope),
        );
    let service = Service::builder(config).build()?;
    let provider = service.get_provider(&provider_name)?;

    let state = generate_state();
    println!("Open this URL in a browser:\n\n  {}\n", provider.make_auth_url_with_state(&state));
    print!("Callback URL: ");
    io::stdout().flush()?;

    let mut line = String::new();
    io::stdin().lock().read_line(&mut line)?;
    let callback = Url::parse(line.trim())?;
    let params: HashMap<String, String> = callback.query_pairs().into_owned().collect();

    let token = provider
        .get_access_token_by_request_parameters_with_state(&params, &state)
        .await?;
    println!("Access token received (expires at {:?})", token.expires_at());

    let user = provider.get_identity(&token).await?;
    println!("id:     {}", user.id);
    println!("name:   {}", user.name.as_deref().unwrap_or("-"));
    println!("email:  {}", user.email.as_deref().unwrap_or("-"));
    println!("avatar: {}", user.avatar.as_deref().unwrap_or("-"));
    Ok(())
}
