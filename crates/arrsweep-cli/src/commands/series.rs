use arrsweep_clients::{EpisodeFile, Series, SonarrClient};
use async_trait::async_trait;

use crate::client::{AppContext, CliResult};
use crate::commands::requests::OverseerrTracker;
use crate::console::Console;
use crate::workflow::{
    Catalog, CatalogItem, SeasonCatalog, WorkflowReport, prune_season, search_and_delete,
    series_item,
};

/// Sonarr series with files on disk.
pub(crate) struct SonarrCatalog {
    client: SonarrClient,
}

impl SonarrCatalog {
    pub(crate) const fn new(client: SonarrClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Catalog for SonarrCatalog {
    fn noun(&self) -> &'static str {
        "series"
    }

    fn plural(&self) -> &'static str {
        "series"
    }

    fn service_name(&self) -> &'static str {
        "Sonarr"
    }

    async fn list_all(&self) -> anyhow::Result<Vec<CatalogItem>> {
        let series = self.client.series_on_disk().await?;
        Ok(series.iter().map(series_item).collect())
    }

    async fn delete_by_id(&self, id: i64) -> anyhow::Result<()> {
        self.client.delete_series(id).await?;
        Ok(())
    }
}

#[async_trait]
impl SeasonCatalog for SonarrCatalog {
    async fn list_series(&self) -> anyhow::Result<Vec<Series>> {
        Ok(self.client.series_on_disk().await?)
    }

    async fn season_files(
        &self,
        series_id: i64,
        season_number: i32,
    ) -> anyhow::Result<Vec<EpisodeFile>> {
        Ok(self
            .client
            .episode_files(series_id, Some(season_number))
            .await?)
    }

    async fn delete_files(&self, files: &[EpisodeFile]) -> anyhow::Result<()> {
        self.client.delete_episode_files(files).await?;
        Ok(())
    }

    async fn update_series(&self, series: &Series) -> anyhow::Result<()> {
        self.client.update_series(series).await?;
        Ok(())
    }
}

pub(crate) async fn handle_series_search(
    ctx: &AppContext,
    console: &mut dyn Console,
    skip: usize,
    limit: usize,
) -> CliResult<WorkflowReport> {
    let catalog = SonarrCatalog::new(ctx.sonarr()?);
    let tracker = OverseerrTracker::series(ctx.overseerr()?);
    search_and_delete(&catalog, &tracker, console, skip, limit).await
}

pub(crate) async fn handle_prune_season(
    ctx: &AppContext,
    console: &mut dyn Console,
    limit: usize,
) -> CliResult<WorkflowReport> {
    let catalog = SonarrCatalog::new(ctx.sonarr()?);
    let tracker = OverseerrTracker::series(ctx.overseerr()?);
    prune_season(&catalog, &tracker, console, limit).await
}
