//! Test support: an in-process fake module proxy.
//!
//! The fake serves `my.mod/module@v1.0.0` (info and zip) plus the metadata of
//! `github.com/Azure/go-autorest@v11.0.0+incompatible` under its escaped
//! path. Every other request falls through to `404 Not Found`.

use std::io::{Cursor, Write};
use std::time::Duration;

use httpmock::prelude::*;
use modproxy_client::ProxyClient;
use zip::write::SimpleFileOptions;

/// Module path served by the fake proxy.
pub const MODULE_PATH: &str = "my.mod/module";
/// Version of [`MODULE_PATH`] served by the fake proxy.
pub const MODULE_VERSION: &str = "v1.0.0";
/// Commit time recorded for [`MODULE_VERSION`].
pub const MODULE_TIME: &str = "2019-01-30T00:00:00Z";
/// Files in the served archive, relative to the module root.
pub const MODULE_FILES: [&str; 5] = ["LICENSE", "README.md", "go.mod", "foo/foo.go", "bar/bar.go"];

/// Mixed-case module served under its escaped path.
pub const AZURE_PATH: &str = "github.com/Azure/go-autorest";
/// Version of [`AZURE_PATH`] served by the fake proxy.
pub const AZURE_VERSION: &str = "v11.0.0+incompatible";

/// A running fake proxy.
pub struct FakeProxy {
    server: MockServer,
}

impl FakeProxy {
    /// Starts a proxy serving the default fixtures.
    pub fn start() -> Self {
        let proxy = Self::empty();
        proxy.serve_info(
            MODULE_PATH,
            MODULE_VERSION,
            &info_json(MODULE_VERSION, MODULE_TIME),
        );
        proxy.serve_zip(
            MODULE_PATH,
            MODULE_VERSION,
            module_zip(MODULE_PATH, MODULE_VERSION, &default_files()),
        );
        proxy.serve_info(
            "github.com/!azure/go-autorest",
            AZURE_VERSION,
            &info_json(AZURE_VERSION, "2018-10-31T17:00:00Z"),
        );
        proxy
    }

    /// Starts a proxy with no fixtures.
    pub fn empty() -> Self {
        Self {
            server: MockServer::start(),
        }
    }

    /// The proxy base URL.
    pub fn base_url(&self) -> String {
        self.server.base_url()
    }

    /// A production client pointed at this proxy.
    pub fn client(&self) -> ProxyClient {
        ProxyClient::new(&self.base_url()).expect("fake proxy URL is valid")
    }

    /// Serves `body` as the `.info` resource of an escaped identity.
    pub fn serve_info(&self, encoded_path: &str, encoded_version: &str, body: &str) {
        let path = format!("/{encoded_path}/@v/{encoded_version}.info");
        let body = body.to_owned();
        self.server.mock(move |when, then| {
            when.method(GET).path(path);
            then.status(200)
                .header("content-type", "application/json")
                .body(body);
        });
    }

    /// Serves `bytes` as the `.zip` resource of an escaped identity.
    pub fn serve_zip(&self, encoded_path: &str, encoded_version: &str, bytes: Vec<u8>) {
        let path = format!("/{encoded_path}/@v/{encoded_version}.zip");
        self.server.mock(move |when, then| {
            when.method(GET).path(path);
            then.status(200)
                .header("content-type", "application/zip")
                .body(bytes);
        });
    }

    /// Serves `body` as the `.info` resource, but only after `delay`.
    pub fn serve_delayed_info(
        &self,
        encoded_path: &str,
        encoded_version: &str,
        body: &str,
        delay: Duration,
    ) {
        let path = format!("/{encoded_path}/@v/{encoded_version}.info");
        let body = body.to_owned();
        self.server.mock(move |when, then| {
            when.method(GET).path(path);
            then.status(200)
                .header("content-type", "application/json")
                .body(body)
                .delay(delay);
        });
    }

    /// Answers `resource_path` with `status` and an empty body.
    pub fn serve_status(&self, resource_path: &str, status: u16) {
        let path = resource_path.to_owned();
        self.server.mock(move |when, then| {
            when.method(GET).path(path);
            then.status(status);
        });
    }
}

/// The `.info` JSON document for `version`.
pub fn info_json(version: &str, time: &str) -> String {
    format!(r#"{{"Version":"{version}","Time":"{time}"}}"#)
}

/// Default archive contents keyed by module-relative name.
pub fn default_files() -> Vec<(&'static str, Vec<u8>)> {
    MODULE_FILES
        .iter()
        .map(|name| (*name, format!("contents of {name}\n").into_bytes()))
        .collect()
}

/// Builds a module zip whose entries live under `{path}@{version}/`.
pub fn module_zip(path: &str, version: &str, files: &[(&str, Vec<u8>)]) -> Vec<u8> {
    let mut writer = zip::ZipWriter::new(Cursor::new(Vec::new()));
    let options = SimpleFileOptions::default();
    for (name, contents) in files {
        writer
            .start_file(format!("{path}@{version}/{name}"), options)
            .expect("start zip entry");
        writer.write_all(contents).expect("write zip entry");
    }
    writer.finish().expect("finish zip").into_inner()
}

/// The full entry names of the default archive.
pub fn expected_entry_names() -> Vec<String> {
    MODULE_FILES
        .iter()
        .map(|name| format!("{MODULE_PATH}@{MODULE_VERSION}/{name}"))
        .collect()
}
