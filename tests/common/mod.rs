//! Helpers shared by the integration tests.
#![allow(dead_code)]

use std::io::{Cursor, Read};
use std::sync::Mutex;

use deckwright::assets::{AssetFetcher, FetchError};
use deckwright::common::Position;
use deckwright::model::{Paragraph, Shape, Slide, TextBox};

/// Fetcher that serves one body for every URL, or fails every request.
pub struct FakeFetcher {
    body: Option<Vec<u8>>,
    pub requests: Mutex<Vec<String>>,
}

impl FakeFetcher {
    pub fn serving(body: Vec<u8>) -> Self {
        Self {
            body: Some(body),
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn unreachable() -> Self {
        Self {
            body: None,
            requests: Mutex::new(Vec::new()),
        }
    }
}

impl AssetFetcher for FakeFetcher {
    fn fetch(&self, url: &str) -> Result<Vec<u8>, FetchError> {
        self.requests.lock().unwrap().push(url.to_string());
        self.body
            .clone()
            .ok_or_else(|| FetchError::Request("operation timed out".into()))
    }
}

/// An opened `.pptx` package.
pub struct Package {
    archive: zip::ZipArchive<Cursor<Vec<u8>>>,
}

impl Package {
    pub fn open(bytes: Vec<u8>) -> Self {
        Self {
            archive: zip::ZipArchive::new(Cursor::new(bytes)).expect("valid zip"),
        }
    }

    pub fn from_file(path: &std::path::Path) -> Self {
        Self::open(std::fs::read(path).expect("package written"))
    }

    pub fn has(&self, name: &str) -> bool {
        self.archive.file_names().any(|n| n == name)
    }

    pub fn bytes(&mut self, name: &str) -> Vec<u8> {
        let mut file = self
            .archive
            .by_name(name)
            .unwrap_or_else(|_| panic!("missing part {name}"));
        let mut buf = Vec::new();
        file.read_to_end(&mut buf).unwrap();
        buf
    }

    pub fn xml(&mut self, name: &str) -> String {
        String::from_utf8(self.bytes(name)).unwrap()
    }

    pub fn slide_xml(&mut self, number: usize) -> String {
        self.xml(&format!("ppt/slides/slide{number}.xml"))
    }

    pub fn slide_count(&self) -> usize {
        self.archive
            .file_names()
            .filter(|n| n.starts_with("ppt/slides/slide") && n.ends_with(".xml"))
            .count()
    }

    pub fn media_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self
            .archive
            .file_names()
            .filter(|n| n.starts_with("ppt/media/"))
            .map(str::to_string)
            .collect();
        names.sort();
        names
    }
}

pub fn text_slide(text: &str) -> Slide {
    Slide {
        shapes: vec![Shape::TextBox(TextBox::new(
            Position::new(40.0, 40.0, 400.0, 60.0),
            vec![Paragraph::markup(text)],
        ))],
        ..Default::default()
    }
}

pub fn png_bytes(image: &image::RgbaImage) -> Vec<u8> {
    deckwright::images::encode_png(image).unwrap()
}
