//! HTTP plumbing shared by the concrete loaders.
//!
//! Every loader spawns its request on a tokio runtime owned by the binary and
//! calls its completion from a runtime worker thread.  Callers marshal the
//! result back to their own thread (see [`crate::headlines`]).

use std::future::Future;
use std::sync::{Arc, Mutex, PoisonError};

use anyhow::{ensure, Context, Result};
use reqwest::{Client, Response, Url};
use tokio::runtime::Handle;
use tokio::task::{AbortHandle, JoinHandle};
use tracing::trace;

use super::{ImageLoader, ImageLoaderCompletion, ImageLoaderTask};

/// A reqwest client bound to the runtime its requests are spawned on.
#[derive(Clone, Debug)]
pub struct HttpClient {
    client: Client,
    runtime: Handle,
}

impl HttpClient {
    pub fn new(runtime: Handle) -> Result<Self> {
        let client = Client::builder()
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
            .build()
            .context("building HTTP client")?;
        Ok(Self { client, runtime })
    }

    pub fn client(&self) -> &Client {
        &self.client
    }

    /// Run `request` on the runtime and hand its output to `completion`.
    pub fn spawn<T, F>(
        &self,
        request: F,
        completion: Box<dyn FnOnce(Result<T>) + Send + 'static>,
    ) -> JoinHandle<()>
    where
        T: Send + 'static,
        F: Future<Output = Result<T>> + Send + 'static,
    {
        self.runtime.spawn(async move { completion(request.await) })
    }
}

/// GET `url`, failing on transport errors and non-2xx statuses.
pub(crate) async fn get(client: &Client, url: Url) -> Result<Response> {
    trace!(%url, "GET");
    let response = client
        .get(url.clone())
        .send()
        .await
        .with_context(|| format!("requesting {url}"))?;
    response
        .error_for_status()
        .with_context(|| format!("unexpected status from {url}"))
}

// ---------------------------------------------------------------------------
// Image loader
// ---------------------------------------------------------------------------

/// Fetches raw image bytes over HTTP.  Decoding is left to the caller.
#[derive(Clone, Debug)]
pub struct HttpImageLoader {
    http: HttpClient,
}

impl HttpImageLoader {
    pub fn new(http: HttpClient) -> Self {
        Self { http }
    }
}

impl ImageLoader for HttpImageLoader {
    fn load_image(&self, url: &Url, completion: ImageLoaderCompletion) -> Box<dyn ImageLoaderTask> {
        let cancelled = CancelFlag::default();
        let client = self.http.client().clone();
        let url = url.clone();

        let handle = self.http.spawn(
            async move { fetch_image(&client, url).await },
            unless_cancelled(Arc::clone(&cancelled), completion),
        );

        Box::new(HttpImageTask {
            cancelled,
            abort: handle.abort_handle(),
        })
    }
}

async fn fetch_image(client: &Client, url: Url) -> Result<Vec<u8>> {
    let body = get(client, url.clone())
        .await?
        .bytes()
        .await
        .with_context(|| format!("reading image body from {url}"))?;
    ensure!(!body.is_empty(), "empty image body from {url}");
    Ok(body.to_vec())
}

/// Shared between a task and its completion.  The completion runs with the
/// lock held, so `cancel` cannot return while it is running.
type CancelFlag = Arc<Mutex<bool>>;

/// Wrap `completion` so it is skipped once `cancelled` is set.
fn unless_cancelled(cancelled: CancelFlag, completion: ImageLoaderCompletion) -> ImageLoaderCompletion {
    Box::new(move |result| {
        let guard = cancelled.lock().unwrap_or_else(PoisonError::into_inner);
        if !*guard {
            completion(result);
        }
    })
}

fn set_cancelled(flag: &CancelFlag) {
    *flag.lock().unwrap_or_else(PoisonError::into_inner) = true;
}

/// Cancellation handle returned by [`HttpImageLoader`].
#[derive(Debug)]
pub struct HttpImageTask {
    cancelled: CancelFlag,
    abort: AbortHandle,
}

impl ImageLoaderTask for HttpImageTask {
    fn cancel(&self) {
        // The flag is what guarantees suppression; aborting only saves work.
        set_cancelled(&self.cancelled);
        self.abort.abort();
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{Read, Write};
    use std::net::TcpListener;
    use std::sync::mpsc;
    use std::thread;
    use std::time::Duration;

    fn recording() -> (Arc<Mutex<Vec<Result<Vec<u8>>>>>, ImageLoaderCompletion) {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        let completion: ImageLoaderCompletion = Box::new(move |result| sink.lock().unwrap().push(result));
        (seen, completion)
    }

    fn flag(value: bool) -> CancelFlag {
        Arc::new(Mutex::new(value))
    }

    /// One-shot HTTP server that answers with `body` once `go` fires.
    fn serve_once(body: &'static [u8]) -> (Url, mpsc::Sender<()>) {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let url = Url::parse(&format!("http://{}/image.jpg", listener.local_addr().unwrap())).unwrap();
        let (go_tx, go_rx) = mpsc::channel::<()>();

        thread::spawn(move || {
            let Ok((mut stream, _)) = listener.accept() else {
                return;
            };
            let mut request = [0u8; 1024];
            let _ = stream.read(&mut request);
            if go_rx.recv().is_err() {
                return;
            }
            let head = format!("HTTP/1.1 200 OK\r\nContent-Length: {}\r\nConnection: close\r\n\r\n", body.len());
            let _ = stream.write_all(head.as_bytes());
            let _ = stream.write_all(body);
        });

        (url, go_tx)
    }

    fn image_loader() -> (tokio::runtime::Runtime, HttpImageLoader) {
        let runtime = tokio::runtime::Runtime::new().unwrap();
        let loader = HttpImageLoader::new(HttpClient::new(runtime.handle().clone()).unwrap());
        (runtime, loader)
    }

    fn sending(tx: mpsc::Sender<Result<Vec<u8>>>) -> ImageLoaderCompletion {
        Box::new(move |result| {
            let _ = tx.send(result);
        })
    }

    #[test]
    fn completion_runs_when_not_cancelled() {
        let (seen, completion) = recording();
        unless_cancelled(flag(false), completion)(Ok(vec![1, 2, 3]));

        let seen = seen.lock().unwrap();
        assert_eq!(seen.len(), 1);
        assert_eq!(seen[0].as_ref().unwrap(), &vec![1, 2, 3]);
    }

    #[test]
    fn completion_is_suppressed_after_cancel() {
        let (seen, completion) = recording();
        unless_cancelled(flag(true), completion)(Ok(vec![1]));
        assert!(seen.lock().unwrap().is_empty());
    }

    #[test]
    fn cancel_waits_for_a_running_completion() {
        let cancelled = flag(false);
        let (started_tx, started_rx) = mpsc::channel();
        let (release_tx, release_rx) = mpsc::channel::<()>();
        let completion: ImageLoaderCompletion = Box::new(move |_| {
            started_tx.send(()).unwrap();
            release_rx.recv().unwrap();
        });

        let guarded = unless_cancelled(Arc::clone(&cancelled), completion);
        let runner = thread::spawn(move || guarded(Ok(vec![])));
        started_rx.recv().unwrap();

        let (done_tx, done_rx) = mpsc::channel();
        let canceller = thread::spawn(move || {
            set_cancelled(&cancelled);
            done_tx.send(()).unwrap();
        });

        assert!(
            done_rx.recv_timeout(Duration::from_millis(100)).is_err(),
            "cancel must not return while the completion runs"
        );
        release_tx.send(()).unwrap();
        done_rx.recv_timeout(Duration::from_secs(5)).unwrap();
        runner.join().unwrap();
        canceller.join().unwrap();
    }

    #[test]
    fn cancel_is_idempotent_and_aborts_the_request() {
        let runtime = tokio::runtime::Runtime::new().unwrap();
        let handle = runtime.spawn(std::future::pending::<()>());
        let task = HttpImageTask {
            cancelled: flag(false),
            abort: handle.abort_handle(),
        };

        task.cancel();
        task.cancel();

        assert!(*task.cancelled.lock().unwrap());
        let joined = runtime.block_on(handle);
        assert!(joined.unwrap_err().is_cancelled());
    }

    #[test]
    fn cancel_after_completion_is_a_noop() {
        let runtime = tokio::runtime::Runtime::new().unwrap();
        let http = HttpClient::new(runtime.handle().clone()).unwrap();
        let (seen, completion) = recording();
        let cancelled = flag(false);

        let handle = http.spawn(
            async { Ok(vec![9]) },
            unless_cancelled(Arc::clone(&cancelled), completion),
        );
        let task = HttpImageTask {
            cancelled,
            abort: handle.abort_handle(),
        };
        runtime.block_on(handle).unwrap();

        task.cancel();
        assert_eq!(seen.lock().unwrap().len(), 1);
    }

    #[test]
    fn load_image_delivers_body() {
        let (_runtime, loader) = image_loader();
        let (url, go) = serve_once(b"abc");
        let (tx, rx) = mpsc::channel();

        let _task = loader.load_image(&url, sending(tx));
        go.send(()).unwrap();

        let result = rx.recv_timeout(Duration::from_secs(5)).unwrap();
        assert_eq!(result.unwrap(), b"abc".to_vec());
    }

    #[test]
    fn load_image_rejects_empty_body() {
        let (_runtime, loader) = image_loader();
        let (url, go) = serve_once(b"");
        let (tx, rx) = mpsc::channel();

        let _task = loader.load_image(&url, sending(tx));
        go.send(()).unwrap();

        assert!(rx.recv_timeout(Duration::from_secs(5)).unwrap().is_err());
    }

    #[test]
    fn cancelled_load_image_never_completes() {
        let (_runtime, loader) = image_loader();
        let (url, go) = serve_once(b"late");
        let (tx, rx) = mpsc::channel();

        let task = loader.load_image(&url, sending(tx));
        task.cancel();
        let _ = go.send(());

        assert!(rx.recv_timeout(Duration::from_millis(300)).is_err());
    }
}
