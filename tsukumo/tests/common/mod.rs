//! Shared fixtures for integration tests.

#![allow(dead_code)]

use std::net::SocketAddr;
use std::path::Path;
use std::sync::Arc;

use tsukumo::manager::{ArchiveCodec, LocalStore, TarCodec};
use tsukumo::package::{ArchiveEntry, ArchiveFormat};

/// Start the repository service over `root` on an ephemeral port.
///
/// The server runs on its own runtime thread for the rest of the test process.
pub fn spawn_repository(root: &Path) -> SocketAddr {
    let store = Arc::new(LocalStore::open(root).unwrap());
    let (tx, rx) = std::sync::mpsc::channel();

    std::thread::spawn(move || {
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .worker_threads(2)
            .enable_all()
            .build()
            .unwrap();
        runtime.block_on(async move {
            let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
            tx.send(listener.local_addr().unwrap()).unwrap();
            tsukumo::server::serve(listener, store).await.unwrap();
        });
    });

    rx.recv().unwrap()
}

/// Build a package archive containing one file and a metadata record.
pub fn package_archive(format: ArchiveFormat, name: &str, deps: &[(&str, &str)]) -> Vec<u8> {
    let deps_json: Vec<String> = deps
        .iter()
        .map(|(n, v)| format!("\"{}\": \"{}\"", n, v))
        .collect();
    let metadata = format!(
        "{{\"name\": \"{}\", \"dependencies\": {{{}}}}}",
        name,
        deps_json.join(", ")
    );

    let entries = vec![
        ArchiveEntry::new(format!("{}/lib.txt", name), format!("contents of {}", name)),
        ArchiveEntry::new("metadata.json", metadata),
    ];
    TarCodec::new().encode(&entries, format).unwrap()
}
