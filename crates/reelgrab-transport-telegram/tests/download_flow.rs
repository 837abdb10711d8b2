use async_trait::async_trait;
use mockall::mock;
use reelgrab_core::fetch::{FetchError, MediaPost, PostResolver, Url};
use reelgrab_transport_telegram::bot::handlers::{
    plan_download, resolve_link, DownloadError, INVALID_LINK_MESSAGE, USAGE_MESSAGE,
};
use reelgrab_transport_telegram::bot::Reply;
use std::io::{self, Write};
use std::sync::{Arc, Mutex};
use tracing_subscriber::{prelude::*, EnvFilter};

mock! {
    pub Resolver {}

    #[async_trait]
    impl PostResolver for Resolver {
        async fn resolve(&self, shortcode: &str) -> Result<MediaPost, FetchError>;
    }
}

fn url(s: &str) -> Url {
    Url::parse(s).expect("static test URL")
}

fn photo_post(shortcode: &str) -> MediaPost {
    MediaPost {
        shortcode: shortcode.to_string(),
        is_video: false,
        video_url: None,
        url: url("https://scontent.cdninstagram.com/v/photo.jpg"),
    }
}

fn video_post(shortcode: &str) -> MediaPost {
    MediaPost {
        shortcode: shortcode.to_string(),
        is_video: true,
        video_url: Some(url("https://scontent.cdninstagram.com/v/clip.mp4")),
        url: url("https://scontent.cdninstagram.com/v/cover.jpg"),
    }
}

/// Collects formatted log output in memory.
#[derive(Clone, Default)]
struct CapturedLogs(Arc<Mutex<Vec<u8>>>);

impl CapturedLogs {
    fn contents(&self) -> String {
        let buf = self.0.lock().expect("log buffer poisoned");
        String::from_utf8_lossy(&buf).into_owned()
    }
}

impl Write for CapturedLogs {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0
            .lock()
            .map_err(|_| io::Error::other("log buffer poisoned"))?
            .extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl<'a> tracing_subscriber::fmt::MakeWriter<'a> for CapturedLogs {
    type Writer = Self;

    fn make_writer(&'a self) -> Self::Writer {
        self.clone()
    }
}

#[tokio::test]
async fn missing_link_is_a_usage_error_without_fetch() {
    let mut resolver = MockResolver::new();
    resolver.expect_resolve().never();

    let reply = plan_download("", &resolver).await;
    assert_eq!(reply, Reply::Html(USAGE_MESSAGE.to_string()));

    let reply = plan_download("   ", &resolver).await;
    assert_eq!(reply, Reply::Html(USAGE_MESSAGE.to_string()));
}

#[tokio::test]
async fn invalid_link_is_rejected_without_fetch() {
    let mut resolver = MockResolver::new();
    resolver.expect_resolve().never();

    let reply = plan_download("https://www.instagram.com/explore/", &resolver).await;
    assert_eq!(reply, Reply::Text(INVALID_LINK_MESSAGE.to_string()));

    let err = resolve_link("https://example.com/p/ABC123/", &resolver)
        .await
        .expect_err("not an Instagram link");
    assert!(matches!(err, DownloadError::InvalidLink));
}

#[tokio::test]
async fn photo_post_yields_photo_reply() {
    let mut resolver = MockResolver::new();
    resolver
        .expect_resolve()
        .withf(|code| code == "ABC123")
        .times(1)
        .returning(|code| Ok(photo_post(code)));

    let reply = plan_download("https://www.instagram.com/p/ABC123/", &resolver).await;
    assert_eq!(
        reply,
        Reply::Photo(url("https://scontent.cdninstagram.com/v/photo.jpg"))
    );
}

#[tokio::test]
async fn reel_with_query_yields_video_reply() {
    let mut resolver = MockResolver::new();
    resolver
        .expect_resolve()
        .withf(|code| code == "XYZ789")
        .times(1)
        .returning(|code| Ok(video_post(code)));

    let reply = plan_download("https://www.instagram.com/reel/XYZ789?utm_source=x", &resolver).await;
    assert_eq!(
        reply,
        Reply::Video(url("https://scontent.cdninstagram.com/v/clip.mp4"))
    );
}

#[tokio::test]
async fn video_without_url_is_reported_as_failure() {
    let mut resolver = MockResolver::new();
    resolver.expect_resolve().times(1).returning(|code| {
        Ok(MediaPost {
            video_url: None,
            ..video_post(code)
        })
    });

    let reply = plan_download("https://www.instagram.com/tv/TV1/", &resolver).await;
    let text = reply.text().expect("failure is a text reply");
    assert!(text.contains("Post TV1 is a video but has no video URL"));
}

#[tokio::test]
async fn fetch_error_is_replied_and_logged() {
    let logs = CapturedLogs::default();
    let subscriber = tracing_subscriber::registry()
        .with(EnvFilter::new("error"))
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(logs.clone())
                .with_ansi(false),
        );
    let _guard = tracing::subscriber::set_default(subscriber);

    let mut resolver = MockResolver::new();
    resolver
        .expect_resolve()
        .times(1)
        .returning(|code| Err(FetchError::LoginRequired(code.to_string())));

    let reply = plan_download("https://www.instagram.com/p/Priv4te/", &resolver).await;

    assert_eq!(
        reply,
        Reply::Text(
            "❌ Failed to fetch the media. Is the post public?\n\n\
             Error: Login required to access post Priv4te"
                .to_string()
        )
    );

    let output = logs.contents();
    assert!(output.contains("ERROR"), "no error entry in: {output}");
    assert!(
        output.contains("Error downloading post: Login required to access post Priv4te"),
        "unexpected log output: {output}"
    );
}

#[tokio::test]
async fn usage_errors_are_not_logged_as_errors() {
    let logs = CapturedLogs::default();
    let subscriber = tracing_subscriber::registry()
        .with(EnvFilter::new("error"))
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(logs.clone())
                .with_ansi(false),
        );
    let _guard = tracing::subscriber::set_default(subscriber);

    let mut resolver = MockResolver::new();
    resolver.expect_resolve().never();

    let _ = plan_download("", &resolver).await;
    let _ = plan_download("not a link", &resolver).await;

    assert!(logs.contents().is_empty());
}
