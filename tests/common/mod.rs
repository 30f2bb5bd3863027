#![allow(dead_code)]

use std::collections::HashMap;
use std::path::Path;
use std::sync::{Arc, Mutex};

use axum::extract::State;
use axum::http::{StatusCode, Uri};
use axum::response::{IntoResponse, Response};
use axum::Router;
use flate2::write::GzEncoder;
use flate2::Compression;

use craftboot::core::downloader::Downloader;
use craftboot::core::http::build_http_client;
use craftboot::core::java::runtime::platform::jdk_marker;

/// Fake `java`: skips JVM flags (logging them to `jvm_flags.txt`) and runs
/// the "jar" as a shell script.
pub const FAKE_JAVA: &str = r#"#!/bin/sh
while [ $# -gt 0 ]; do
  case "$1" in
    -jar) shift; jar="$1"; shift; exec sh "$jar" "$@" ;;
    *) echo "$1" >> jvm_flags.txt; shift ;;
  esac
done
exit 64
"#;

#[derive(Default)]
struct Routes {
    bodies: HashMap<String, Vec<u8>>,
    hits: HashMap<String, usize>,
}

/// Local stand-in for every upstream, counting requests per path.
pub struct MockUpstream {
    pub base: String,
    routes: Arc<Mutex<Routes>>,
}

impl MockUpstream {
    pub async fn start() -> Self {
        let routes = Arc::new(Mutex::new(Routes::default()));
        let app = Router::new().fallback(serve).with_state(routes.clone());

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self {
            base: format!("http://{addr}"),
            routes,
        }
    }

    pub fn route(&self, path: &str, body: impl Into<Vec<u8>>) {
        self.routes
            .lock()
            .unwrap()
            .bodies
            .insert(path.to_string(), body.into());
    }

    pub fn hits(&self, path: &str) -> usize {
        self.routes
            .lock()
            .unwrap()
            .hits
            .get(path)
            .copied()
            .unwrap_or(0)
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base, path)
    }

    /// Publish a Temurin "latest release" for `major` whose archive unpacks
    /// to `jdk-<major>/` with the fake launcher in `bin/`.
    pub fn publish_jdk(&self, major: &str) {
        let archive_path = format!("/dl/jdk{major}.tar.gz");
        let asset_name = format!("OpenJDK{major}U-{}_hotspot_{major}.tar.gz", jdk_marker());
        let release = serde_json::json!({
            "tag_name": format!("jdk-{major}+1"),
            "assets": [
                {
                    "name": format!("{asset_name}.sha256.txt"),
                    "browser_download_url": self.url("/dl/checksum.txt"),
                },
                {
                    "name": asset_name,
                    "browser_download_url": self.url(&archive_path),
                },
            ],
        });
        self.route(
            &release_path(major),
            serde_json::to_vec(&release).unwrap(),
        );
        self.route(&archive_path, fake_jdk_archive(&format!("jdk-{major}")));
    }
}

pub fn release_path(major: &str) -> String {
    format!("/repos/adoptium/temurin{major}-binaries/releases/latest")
}

async fn serve(State(routes): State<Arc<Mutex<Routes>>>, uri: Uri) -> Response {
    let mut routes = routes.lock().unwrap();
    let path = uri.path().to_string();
    *routes.hits.entry(path.clone()).or_default() += 1;
    match routes.bodies.get(&path) {
        Some(body) => (StatusCode::OK, body.clone()).into_response(),
        None => StatusCode::NOT_FOUND.into_response(),
    }
}

/// A tar.gz holding `<root>/bin/java` (not executable) and `<root>/release`.
pub fn fake_jdk_archive(root: &str) -> Vec<u8> {
    let mut builder = tar::Builder::new(GzEncoder::new(Vec::new(), Compression::default()));

    let dirs = [format!("{root}/"), format!("{root}/bin/")];
    for dir in &dirs {
        let mut header = tar::Header::new_gnu();
        header.set_entry_type(tar::EntryType::Directory);
        header.set_mode(0o755);
        header.set_size(0);
        header.set_cksum();
        builder
            .append_data(&mut header, dir, std::io::empty())
            .unwrap();
    }

    let files: [(String, &[u8]); 2] = [
        (format!("{root}/bin/java"), FAKE_JAVA.as_bytes()),
        (format!("{root}/release"), b"JAVA_VERSION=\"fake\"\n"),
    ];
    for (name, body) in &files {
        let mut header = tar::Header::new_gnu();
        header.set_mode(0o644);
        header.set_size(body.len() as u64);
        header.set_cksum();
        builder.append_data(&mut header, name, *body).unwrap();
    }

    builder.into_inner().unwrap().finish().unwrap()
}

pub fn downloader() -> Downloader {
    Downloader::new(build_http_client().unwrap())
}

/// Names in `dir` that look like leftover staging directories.
pub fn staging_leftovers(dir: &Path) -> Vec<String> {
    match std::fs::read_dir(dir) {
        Ok(entries) => entries
            .filter_map(|e| e.ok())
            .map(|e| e.file_name().to_string_lossy().into_owned())
            .filter(|name| name.starts_with(".staging-"))
            .collect(),
        Err(_) => Vec::new(),
    }
}
