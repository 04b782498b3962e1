use arrsweep_clients::{Movie, RadarrClient};
use async_trait::async_trait;

use crate::client::{AppContext, CliError, CliResult};
use crate::commands::requests::OverseerrTracker;
use crate::console::Console;
use crate::output::render_movie_list;
use crate::workflow::{Catalog, CatalogItem, WorkflowReport, search_and_delete, sort_by_size_desc};

/// Radarr movies with files on disk; TMDB ids link them to tracked requests.
pub(crate) struct RadarrCatalog {
    client: RadarrClient,
}

impl RadarrCatalog {
    pub(crate) const fn new(client: RadarrClient) -> Self {
        Self { client }
    }
}

fn movie_item(movie: &Movie) -> CatalogItem {
    CatalogItem {
        id: movie.id,
        external_id: movie.tmdb_id,
        title: movie.title.clone(),
        size_bytes: movie.size_on_disk_bytes(),
    }
}

#[async_trait]
impl Catalog for RadarrCatalog {
    fn noun(&self) -> &'static str {
        "movie"
    }

    fn plural(&self) -> &'static str {
        "movies"
    }

    fn service_name(&self) -> &'static str {
        "Radarr"
    }

    async fn list_all(&self) -> anyhow::Result<Vec<CatalogItem>> {
        let movies = self.client.movies_on_disk().await?;
        Ok(movies.iter().map(movie_item).collect())
    }

    async fn delete_by_id(&self, id: i64) -> anyhow::Result<()> {
        self.client.delete_movie(id).await?;
        Ok(())
    }
}

/// Print the largest movies on disk.
pub(crate) async fn handle_movies_list(ctx: &AppContext, limit: usize) -> CliResult<()> {
    let mut movies = ctx
        .radarr()?
        .movies_on_disk()
        .await
        .map_err(|err| {
            CliError::failure(anyhow::Error::new(err).context("failed to fetch movies from Radarr"))
        })?;
    sort_by_size_desc(&mut movies, Movie::size_on_disk_bytes);
    movies.truncate(limit);
    let text = render_movie_list(&movies, ctx.output)?;
    print!("{text}");
    Ok(())
}

pub(crate) async fn handle_movies_search(
    ctx: &AppContext,
    console: &mut dyn Console,
    skip: usize,
    limit: usize,
) -> CliResult<WorkflowReport> {
    let catalog = RadarrCatalog::new(ctx.radarr()?);
    let tracker = OverseerrTracker::movies(ctx.overseerr()?);
    search_and_delete(&catalog, &tracker, console, skip, limit).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::testing::context_with;
    use crate::console::ScriptedConsole;
    use httpmock::MockServer;
    use httpmock::prelude::*;
    use serde_json::json;

    const GIB: u64 = 1_073_741_824;

    fn movies_body() -> serde_json::Value {
        json!([
            { "id": 1, "title": "Small", "tmdbId": 11, "statistics": { "sizeOnDisk": GIB } },
            { "id": 2, "title": "Large", "tmdbId": 10, "statistics": { "sizeOnDisk": 3 * GIB } },
            { "id": 3, "title": "Missing", "tmdbId": 12, "statistics": { "sizeOnDisk": 0 } }
        ])
    }

    fn overseerr_media(server: &MockServer) {
        server.mock(|when, then| {
            when.method(GET)
                .path("/overseerr/api/v1/media")
                .header("x-api-key", "overseerr-key");
            then.status(200).json_body(json!({
                "pageInfo": { "page": 1, "pages": 1, "pageSize": 100, "results": 2 },
                "results": [
                    { "id": 100, "tmdbId": 10, "mediaType": "movie" },
                    { "id": 101, "tvdbId": 10, "mediaType": "tv" }
                ]
            }));
        });
    }

    #[tokio::test]
    async fn catalog_skips_movies_without_files() {
        let server = MockServer::start_async().await;
        server.mock(|when, then| {
            when.method(GET)
                .path("/radarr/api/v3/movie")
                .header("x-api-key", "radarr-key");
            then.status(200).json_body(movies_body());
        });

        let ctx = context_with(&server);
        let catalog = RadarrCatalog::new(ctx.radarr().expect("configured"));
        let items = catalog.list_all().await.expect("list succeeds");

        let ids: Vec<(i64, i64)> = items.iter().map(|item| (item.id, item.external_id)).collect();
        assert_eq!(ids, vec![(1, 11), (2, 10)]);
    }

    #[tokio::test]
    async fn search_deletes_request_then_movie() {
        let server = MockServer::start_async().await;
        server.mock(|when, then| {
            when.method(GET).path("/radarr/api/v3/movie");
            then.status(200).json_body(movies_body());
        });
        overseerr_media(&server);
        let request_delete = server.mock(|when, then| {
            when.method(DELETE).path("/overseerr/api/v1/media/100");
            then.status(204);
        });
        let movie_delete = server.mock(|when, then| {
            when.method(DELETE)
                .path("/radarr/api/v3/movie/2")
                .query_param("deleteFiles", "true");
            then.status(200);
        });

        let ctx = context_with(&server);
        let mut console = ScriptedConsole::new(&["1", "y"]);
        let report = handle_movies_search(&ctx, &mut console, 0, 10)
            .await
            .expect("workflow completes");

        request_delete.assert();
        movie_delete.assert();
        assert!(console.contains("1: Large (3.00 GB)"));
        assert!(console.contains("Movie 'Large' was successfully deleted from Radarr."));
        assert_eq!(report.deleted, 1);
        assert_eq!(report.requests_deleted, 1);
    }

    #[tokio::test]
    async fn search_fails_when_radarr_is_unreachable() {
        let server = MockServer::start_async().await;
        server.mock(|when, then| {
            when.method(GET).path("/radarr/api/v3/movie");
            then.status(500);
        });

        let ctx = context_with(&server);
        let mut console = ScriptedConsole::new(&[]);
        let err = handle_movies_search(&ctx, &mut console, 0, 10)
            .await
            .expect_err("fetch failure is fatal");

        assert_eq!(err.exit_code(), 1);
        assert!(err.display_message().starts_with("failed to fetch movies from Radarr"));
    }

    #[tokio::test]
    async fn list_requires_radarr_configuration() {
        let server = MockServer::start_async().await;
        let mut ctx = context_with(&server);
        ctx.config.radarr = arrsweep_config::ServiceSettings::default();

        let err = handle_movies_list(&ctx, 10).await.expect_err("unconfigured");
        assert_eq!(err.exit_code(), 2);
    }

    #[tokio::test]
    async fn list_prints_movies_on_disk() {
        let server = MockServer::start_async().await;
        let mock = server.mock(|when, then| {
            when.method(GET).path("/radarr/api/v3/movie");
            then.status(200).json_body(movies_body());
        });

        let ctx = context_with(&server);
        handle_movies_list(&ctx, 1).await.expect("listing succeeds");
        mock.assert();
    }
}
