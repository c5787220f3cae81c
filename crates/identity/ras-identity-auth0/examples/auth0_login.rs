//! Walks through an Auth0 login from the command line.
//!
//! Reads `AUTH0_DOMAIN`, `AUTH0_CLIENT_ID`, `AUTH0_CLIENT_SECRET` and `AUTH0_REDIRECT_URI`
//! (a `.env` file works too), prints the authorization URL, then waits for the `code`
//! query parameter from the callback to be pasted in.

use ras_identity_auth0::{Auth0Config, Auth0Provider, PkceChallenge, generate_state};
use std::io::BufRead;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("ras_identity_auth0=debug,info")),
        )
        .init();

    let provider = Auth0Provider::from_config(Auth0Config::from_env()?)?;

    let state = generate_state();
    let pkce = PkceChallenge::new();
    let auth_url = provider.build_authorization_url_with_pkce(&state, &pkce)?;

    println!("Auth0 Example");
    println!("=============");
    println!("\n1. Open this URL in a browser:\n{}", auth_url);
    println!("\n2. Paste the `code` parameter from the callback (state should be {}):", state);

    let mut code = String::new();
    std::io::stdin().lock().read_line(&mut code)?;

    let tokens = provider
        .exchange_authorization_code_with_verifier(code.trim(), &pkce.code_verifier)
        .await?;
    if let Some(id_token) = &tokens.id_token {
        println!("\n3. Received ID token ({} bytes)", id_token.len());
    }

    let profile = provider.fetch_user_profile(&tokens.access_token).await?;
    println!("\n4. Signed in as {} ({:?})", profile.sub, profile.name);

    match &tokens.refresh_token {
        Some(refresh_token) => {
            let refreshed = provider.refresh_tokens(refresh_token).await?;
            println!(
                "\n5. Refreshed tokens, new access token is {} bytes",
                refreshed.access_token.len()
            );
        }
        None => println!("\n5. No refresh token issued; add offline_access to AUTH0_SCOPES"),
    }

    Ok(())
}
