//! Resource listing operation.

use std::io::{self, Write};

use hubdeck::{FetchRequest, HubdeckConfig, IntegrationError, ResourceFetcher};

use super::output::write_resource_set_to;
use super::{build_gateway, connect_session};

/// Lists one page of the configured resource kind.
///
/// # Errors
///
/// Returns [`IntegrationError::Configuration`] for an unknown kind,
/// [`IntegrationError::InvalidRepository`] when a repository-scoped kind has
/// no repository, and any validation or GitHub error otherwise.
pub async fn run(config: &HubdeckConfig) -> Result<(), IntegrationError> {
    let mut stdout = io::stdout().lock();
    run_to(config, &mut stdout).await
}

/// Lists one page and writes it to `writer`.
pub async fn run_to<W: Write>(
    config: &HubdeckConfig,
    writer: &mut W,
) -> Result<(), IntegrationError> {
    let request = FetchRequest::for_kind(config.resource_kind()?, config.repository()?)?
        .with_page(config.page);

    let gateway = build_gateway(config)?;
    let (session, _identity) = connect_session(config, &gateway).await?;
    let fetcher = ResourceFetcher::new(session, gateway);

    let set = fetcher.fetch(&request).await?;
    write_resource_set_to(writer, &set, request.repository())
}
