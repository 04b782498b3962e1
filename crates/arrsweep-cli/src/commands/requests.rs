use arrsweep_clients::{Media, OverseerrClient};
use async_trait::async_trait;

use crate::client::{AppContext, CliError, CliResult};
use crate::output::render_request_list;
use crate::resolver::TrackedRequest;
use crate::workflow::RequestTracker;

/// Overseerr media records of one type, exposed as tracked requests.
pub(crate) struct OverseerrTracker {
    client: OverseerrClient,
    media_type: &'static str,
}

impl OverseerrTracker {
    pub(crate) const fn movies(client: OverseerrClient) -> Self {
        Self {
            client,
            media_type: "movie",
        }
    }

    pub(crate) const fn series(client: OverseerrClient) -> Self {
        Self {
            client,
            media_type: "tv",
        }
    }

    /// Overseerr stores no title, so one is derived from type and id.
    fn tracked(&self, media: &Media) -> Option<TrackedRequest> {
        let external_id = media.external_id_for(self.media_type)?;
        Some(TrackedRequest {
            id: media.id,
            external_id,
            title: format!("{} {external_id}", self.media_type),
        })
    }
}

#[async_trait]
impl RequestTracker for OverseerrTracker {
    fn service_name(&self) -> &'static str {
        "Overseerr"
    }

    async fn list_all(&self) -> anyhow::Result<Vec<TrackedRequest>> {
        let media = self.client.list_media().await?;
        Ok(media.iter().filter_map(|media| self.tracked(media)).collect())
    }

    async fn delete_by_id(&self, id: i64) -> anyhow::Result<()> {
        self.client.delete_media(id).await?;
        Ok(())
    }
}

pub(crate) async fn handle_requests_list(ctx: &AppContext) -> CliResult<()> {
    let requests = ctx
        .overseerr()?
        .list_requests()
        .await
        .map_err(|err| {
            CliError::failure(anyhow::Error::new(err).context("failed to fetch requests from Overseerr"))
        })?;
    let text = render_request_list(&requests, ctx.output)?;
    print!("{text}");
    Ok(())
}
