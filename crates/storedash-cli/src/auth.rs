use storedash_client::AdminClient;

/// Logs in and persists the issued token to the session file.
///
/// # Errors
///
/// Returns an error if the credentials are refused or the session file
/// cannot be written.
pub(crate) async fn run_login(client: &AdminClient, email: &str, password: &str) -> anyhow::Result<()> {
    client
        .login(email, password)
        .await
        .map_err(|err| anyhow::anyhow!("login failed: {}", err.user_message()))?;
    println!("logged in as {email}");
    Ok(())
}

/// Logs out. The local session is cleared even if the server call fails.
///
/// # Errors
///
/// Returns an error if the session file cannot be removed.
pub(crate) async fn run_logout(client: &AdminClient) -> anyhow::Result<()> {
    if !client.session().is_authenticated() {
        println!("not logged in");
        return Ok(());
    }
    if let Err(err) = client.logout().await {
        tracing::warn!(error = %err, "server logout failed; clearing local session");
        client.session().clear()?;
    }
    println!("logged out");
    Ok(())
}
