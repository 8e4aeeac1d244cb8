//! Polling loop that processes unprocessed posts.
//!
//! One cycle fetches the unprocessed posts, then for each one in the order
//! received waits the processing delay and marks it processed. A failed fetch
//! skips the cycle; a failed mark is logged and the loop moves on. Nothing is
//! retried before the next scheduled cycle.

use std::future::Future;
use std::time::Duration;

use tokio::time::sleep;
use tracing::{error, info, warn};

use super::client::{ApiClient, ClientError};

/// Outcome of one worker cycle.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CycleReport {
    /// Posts returned by the fetch
    pub fetched: usize,
    /// Posts the API confirmed as processed
    pub marked: usize,
    /// Posts whose mark-processed call failed
    pub failed: usize,
}

/// Timing of the polling loop.
#[derive(Debug, Clone, Copy)]
pub struct PollSettings {
    /// Sleep between the end of one cycle and the start of the next
    pub poll_interval: Duration,
    /// Simulated work per post
    pub processing_delay: Duration,
}

/// Run a single fetch-process-mark cycle.
pub async fn run_cycle(client: &ApiClient, processing_delay: Duration) -> CycleReport {
    let posts = match client.fetch_unprocessed().await {
        Ok(posts) => posts,
        Err(e) => {
            log_fetch_error(&e);
            return CycleReport::default();
        }
    };

    let mut report = CycleReport {
        fetched: posts.len(),
        ..CycleReport::default()
    };

    info!(count = report.fetched, "worker_posts_fetched");

    for post in posts {
        info!(post_id = post.id, title = %post.title, "worker_post_processing");
        sleep(processing_delay).await;

        info!(post_id = post.id, "worker_post_updating");
        match client.mark_processed(post.id).await {
            Ok(updated) => {
                report.marked += 1;
                info!(
                    post_id = updated.id,
                    processed = updated.processed,
                    "worker_post_marked"
                );
            }
            Err(e) => {
                report.failed += 1;
                error!(post_id = post.id, error = %e, "worker_mark_failed");
            }
        }
    }

    report
}

fn log_fetch_error(e: &ClientError) {
    match e {
        ClientError::Transport(inner) if inner.is_timeout() => {
            warn!(error = %e, "worker_fetch_timeout");
        }
        ClientError::Decode(_) => {
            error!(error = %e, "worker_fetch_decode_failed");
        }
        _ => {
            error!(error = %e, "worker_fetch_failed");
        }
    }
}

/// Run cycles forever, sleeping `poll_interval` after each one, until
/// `shutdown` completes.
pub async fn run<F>(client: ApiClient, settings: PollSettings, shutdown: F)
where
    F: Future<Output = ()>,
{
    tokio::pin!(shutdown);

    info!(
        base_url = %client.base_url(),
        poll_interval_secs = settings.poll_interval.as_secs_f64(),
        processing_delay_secs = settings.processing_delay.as_secs_f64(),
        "worker_ready"
    );

    let mut cycle: u64 = 0;
    loop {
        cycle += 1;

        tokio::select! {
            _ = &mut shutdown => {
                info!(cycle = cycle, "worker_stopping");
                break;
            }
            report = async {
                let report = run_cycle(&client, settings.processing_delay).await;
                sleep(settings.poll_interval).await;
                report
            } => {
                info!(
                    cycle = cycle,
                    fetched = report.fetched,
                    marked = report.marked,
                    failed = report.failed,
                    "worker_cycle_complete"
                );
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::net::SocketAddr;
    use std::sync::{Arc, Mutex};

    use axum::{
        extract::Path,
        http::StatusCode,
        response::IntoResponse,
        routing::{get, patch},
        Json, Router,
    };
    use tokio::net::TcpListener;

    use super::*;
    use crate::store::{Post, PostFilter, PostStore};
    use crate::web::{router, AppState};

    /// Serve `app` on an ephemeral port.
    async fn spawn_router(app: Router) -> SocketAddr {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        addr
    }

    /// Serve the real API router on an ephemeral port.
    async fn spawn_api(store: PostStore) -> SocketAddr {
        spawn_router(router(AppState::new(store))).await
    }

    fn post(id: u64, processed: bool) -> Post {
        Post {
            id,
            title: format!("t{id}"),
            text: "x".to_string(),
            processed,
        }
    }

    fn client_for(addr: SocketAddr) -> ApiClient {
        ApiClient::new(&format!("http://{addr}"), Duration::from_secs(5)).unwrap()
    }

    #[tokio::test]
    async fn test_cycle_marks_unprocessed_posts() {
        let store = PostStore::new();
        store.create("A".to_string(), "B".to_string());
        store.create("C".to_string(), "D".to_string());
        store.create("E".to_string(), "F".to_string());
        store.mark_processed(2).unwrap();

        let client = client_for(spawn_api(store.clone()).await);
        let report = run_cycle(&client, Duration::ZERO).await;

        assert_eq!(
            report,
            CycleReport {
                fetched: 2,
                marked: 2,
                failed: 0,
            }
        );
        assert!(store.list(PostFilter::Unprocessed).is_empty());
        assert_eq!(store.len(), 3);
    }

    #[tokio::test]
    async fn test_cycle_with_nothing_to_do() {
        let store = PostStore::new();
        let client = client_for(spawn_api(store.clone()).await);

        let report = run_cycle(&client, Duration::ZERO).await;

        assert_eq!(report, CycleReport::default());
        assert!(store.is_empty());
    }

    #[tokio::test]
    async fn test_cycle_survives_unreachable_api() {
        // Bind then drop to get a port nothing listens on.
        let addr = {
            let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
            listener.local_addr().unwrap()
        };

        let report = run_cycle(&client_for(addr), Duration::ZERO).await;

        assert_eq!(report, CycleReport::default());
    }

    #[tokio::test]
    async fn test_cycle_skipped_on_malformed_listing() {
        let marks = Arc::new(Mutex::new(Vec::<u64>::new()));
        let recorded = Arc::clone(&marks);
        let app = Router::new()
            .route("/posts", get(|| async { "not json" }))
            .route(
                "/posts/:id",
                patch(move |Path(id): Path<u64>| async move {
                    recorded.lock().unwrap().push(id);
                    Json(post(id, true))
                }),
            );

        let client = client_for(spawn_router(app).await);
        let report = run_cycle(&client, Duration::ZERO).await;

        assert_eq!(report, CycleReport::default());
        assert!(marks.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_cycle_skipped_on_error_status() {
        let app = Router::new().route(
            "/posts",
            get(|| async { (StatusCode::INTERNAL_SERVER_ERROR, "boom").into_response() }),
        );

        let client = client_for(spawn_router(app).await);
        let report = run_cycle(&client, Duration::ZERO).await;

        assert_eq!(report, CycleReport::default());
    }

    #[tokio::test]
    async fn test_cycle_continues_after_failed_mark() {
        let marks = Arc::new(Mutex::new(Vec::<u64>::new()));
        let recorded = Arc::clone(&marks);
        let app = Router::new()
            .route(
                "/posts",
                get(|| async { Json(vec![post(1, false), post(2, false)]) }),
            )
            .route(
                "/posts/:id",
                patch(move |Path(id): Path<u64>| async move {
                    if id == 1 {
                        return (StatusCode::NOT_FOUND, "Post not found").into_response();
                    }
                    recorded.lock().unwrap().push(id);
                    Json(post(id, true)).into_response()
                }),
            );

        let client = client_for(spawn_router(app).await);
        let report = run_cycle(&client, Duration::ZERO).await;

        assert_eq!(
            report,
            CycleReport {
                fetched: 2,
                marked: 1,
                failed: 1,
            }
        );
        assert_eq!(*marks.lock().unwrap(), vec![2]);
    }

    #[tokio::test]
    async fn test_client_round_trip_against_api() {
        let store = PostStore::new();
        store.create("A".to_string(), "B".to_string());
        let client = client_for(spawn_api(store.clone()).await);

        let fetched = client.fetch_unprocessed().await.unwrap();
        assert_eq!(fetched.len(), 1);
        assert!(!fetched[0].processed);

        let updated = client.mark_processed(1).await.unwrap();
        assert!(updated.processed);

        // Repeating is harmless.
        assert!(client.mark_processed(1).await.unwrap().processed);

        match client.mark_processed(999).await {
            Err(ClientError::Status(status)) => assert_eq!(status, reqwest::StatusCode::NOT_FOUND),
            other => panic!("expected 404 status error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_run_stops_on_shutdown() {
        let store = PostStore::new();
        store.create("A".to_string(), "B".to_string());
        let client = client_for(spawn_api(store.clone()).await);

        let settings = PollSettings {
            poll_interval: Duration::from_millis(10),
            processing_delay: Duration::ZERO,
        };

        let watched = store.clone();
        let shutdown = async move {
            while !watched.list(PostFilter::Unprocessed).is_empty() {
                sleep(Duration::from_millis(5)).await;
            }
        };

        tokio::time::timeout(Duration::from_secs(5), run(client, settings, shutdown))
            .await
            .expect("worker did not stop after shutdown");

        assert!(store.list(PostFilter::All)[0].processed);
    }
}
