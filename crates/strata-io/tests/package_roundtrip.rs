// Copyright 2025 eraflo
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use anyhow::Result;
use async_trait::async_trait;
use std::{
    collections::{BTreeSet, HashMap},
    io,
    path::{Path, PathBuf},
    sync::{
        atomic::{AtomicUsize, Ordering},
        Arc,
    },
};
use strata_core::{
    asset::{AssetGuid, CatalogEntry, LogicalPath, PackageCatalog},
    io::{AsyncFileIo, IoPriority},
    StorageContext, StorageRoots,
};
use strata_io::{
    text_mirror_path, AssetManager, LoadError, LoadStage, PackageLoader, SaveError,
    StorageConfig, TokioFileIo,
};
use tempfile::TempDir;

/// Wraps the tokio backend and counts the reads it serves.
#[derive(Default)]
struct CountingIo {
    reads: AtomicUsize,
}

#[async_trait]
impl AsyncFileIo for CountingIo {
    async fn read(
        &self,
        path: &Path,
        offset: u64,
        len: usize,
        priority: IoPriority,
    ) -> io::Result<Vec<u8>> {
        self.reads.fetch_add(1, Ordering::SeqCst);
        TokioFileIo.read(path, offset, len, priority).await
    }

    async fn write(&self, path: &Path, bytes: &[u8]) -> io::Result<usize> {
        TokioFileIo.write(path, bytes).await
    }

    async fn exists(&self, path: &Path) -> bool {
        TokioFileIo.exists(path).await
    }
}

/// A backend whose package writes stop halfway and whose mirror writes fail.
struct FlakyIo;

#[async_trait]
impl AsyncFileIo for FlakyIo {
    async fn read(
        &self,
        path: &Path,
        offset: u64,
        len: usize,
        priority: IoPriority,
    ) -> io::Result<Vec<u8>> {
        TokioFileIo.read(path, offset, len, priority).await
    }

    async fn write(&self, path: &Path, bytes: &[u8]) -> io::Result<usize> {
        if path.extension().is_some_and(|ext| ext == "json") {
            return Err(io::Error::new(io::ErrorKind::PermissionDenied, "read-only"));
        }
        TokioFileIo.write(path, &bytes[..bytes.len() / 2]).await
    }

    async fn exists(&self, path: &Path) -> bool {
        TokioFileIo.exists(path).await
    }
}

/// A backend whose mirror writes fail but package writes succeed.
struct NoMirrorIo;

#[async_trait]
impl AsyncFileIo for NoMirrorIo {
    async fn read(
        &self,
        path: &Path,
        offset: u64,
        len: usize,
        priority: IoPriority,
    ) -> io::Result<Vec<u8>> {
        TokioFileIo.read(path, offset, len, priority).await
    }

    async fn write(&self, path: &Path, bytes: &[u8]) -> io::Result<usize> {
        if path.extension().is_some_and(|ext| ext == "json") {
            return Err(io::Error::new(io::ErrorKind::PermissionDenied, "read-only"));
        }
        TokioFileIo.write(path, bytes).await
    }

    async fn exists(&self, path: &Path) -> bool {
        TokioFileIo.exists(path).await
    }
}

fn roots(dir: &TempDir) -> StorageRoots {
    StorageRoots::new(dir.path().join("engine"), dir.path().join("project"))
        .with_plugin("terrain", dir.path().join("plugins/terrain"))
}

fn loader_with(dir: &TempDir, io: Arc<dyn AsyncFileIo>) -> PackageLoader {
    PackageLoader::new(StorageContext::new(roots(dir), io))
}

fn sample_catalog() -> PackageCatalog {
    let texture = AssetGuid::new();
    let material = AssetGuid::new();
    let shader = AssetGuid::new();
    [
        CatalogEntry::new(texture, "engine:props/crate.albedo"),
        CatalogEntry::new(shader, "engine:props/crate.shader"),
        CatalogEntry::new(material, "engine:props/crate.material")
            .with_dependency(texture)
            .with_dependency(shader),
    ]
    .into_iter()
    .collect()
}

fn persisted_shape(catalog: &PackageCatalog) -> BTreeSet<(AssetGuid, Vec<AssetGuid>, u64, u64)> {
    catalog
        .iter()
        .map(|entry| (entry.id, entry.dependencies.clone(), entry.offset, entry.size))
        .collect()
}

#[tokio::test]
async fn test_save_then_load_preserves_identities_and_dependencies() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let loader = loader_with(&dir, Arc::new(TokioFileIo));
    let catalog = sample_catalog();
    let path = dir.path().join("engine/props/crate.ap");

    loader.save(&catalog, &path).await?;
    let loaded = loader.load(&path).await?;

    assert_eq!(persisted_shape(&loaded), persisted_shape(&catalog));
    assert!(loaded.iter().all(|entry| entry.path.is_empty()));
    assert!(!text_mirror_path(&path).exists());
    Ok(())
}

#[tokio::test]
async fn test_empty_catalog_round_trips() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let loader = loader_with(&dir, Arc::new(TokioFileIo));
    let path = dir.path().join("empty.ap");

    loader.save(&PackageCatalog::new(), &path).await?;

    assert!(loader.load(&path).await?.is_empty());
    Ok(())
}

#[tokio::test]
async fn test_header_declares_exact_body_length() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let loader = loader_with(&dir, Arc::new(TokioFileIo));
    let path = dir.path().join("sized.ap");

    loader.save(&sample_catalog(), &path).await?;

    let bytes = std::fs::read(&path)?;
    let declared = u32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]) as usize;
    assert_eq!(declared, bytes.len() - 4);
    Ok(())
}

#[tokio::test]
async fn test_missing_file_fails_without_reading() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let io = Arc::new(CountingIo::default());
    let loader = loader_with(&dir, io.clone());
    let path = dir.path().join("missing.ap");

    let result = loader.load(&path).await;

    assert!(matches!(result, Err(LoadError::NotFound(p)) if p == path));
    assert_eq!(io.reads.load(Ordering::SeqCst), 0);
    Ok(())
}

#[tokio::test]
async fn test_file_shorter_than_length_field_is_truncated() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let loader = loader_with(&dir, Arc::new(TokioFileIo));
    let path = dir.path().join("stub.ap");
    std::fs::write(&path, [7, 0])?;

    let result = loader.load(&path).await;

    assert!(matches!(
        result,
        Err(LoadError::Truncated {
            stage: LoadStage::ReadingLengthField,
            expected: 4,
            actual: 2,
            ..
        })
    ));
    Ok(())
}

#[tokio::test]
async fn test_body_shorter_than_declared_is_truncated() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let loader = loader_with(&dir, Arc::new(TokioFileIo));
    let path = dir.path().join("cut.ap");

    loader.save(&sample_catalog(), &path).await?;
    let mut bytes = std::fs::read(&path)?;
    let full_body = bytes.len() as u64 - 4;
    bytes.truncate(bytes.len() - 5);
    std::fs::write(&path, &bytes)?;

    match loader.load(&path).await {
        Err(LoadError::Truncated {
            stage: LoadStage::ReadingBody,
            expected,
            actual,
            ..
        }) => {
            assert_eq!(expected, full_body);
            assert_eq!(actual, full_body - 5);
        }
        other => panic!("expected a truncated body, got {other:?}"),
    }
    Ok(())
}

#[tokio::test]
async fn test_corrupt_body_is_a_decode_error() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let loader = loader_with(&dir, Arc::new(TokioFileIo));
    let path = dir.path().join("corrupt.ap");
    // Declares a 1 byte body holding an entry count of 200 with no entries.
    std::fs::write(&path, [1, 0, 0, 0, 200])?;

    let result = loader.load(&path).await;

    assert!(matches!(result, Err(LoadError::Decode { .. })));
    Ok(())
}

#[tokio::test]
async fn test_short_write_is_reported() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let loader = loader_with(&dir, Arc::new(FlakyIo));
    let path = dir.path().join("half.ap");

    let result = loader.save(&sample_catalog(), &path).await;

    match result {
        Err(SaveError::ShortWrite {
            written, expected, ..
        }) => assert_eq!(written, expected / 2),
        other => panic!("expected a short write, got {other:?}"),
    }
    Ok(())
}

#[tokio::test]
async fn test_text_mirror_is_written_when_enabled() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let mut loader = loader_with(&dir, Arc::new(TokioFileIo));
    loader.set_additional_save_to_text(true);
    let catalog = sample_catalog();
    let path = dir.path().join("engine/props/crate.ap");

    loader.save(&catalog, &path).await?;

    let mirror: serde_json::Value =
        serde_json::from_slice(&std::fs::read(text_mirror_path(&path))?)?;
    assert_eq!(mirror["entry_count"], 3);
    assert_eq!(mirror["entries"].as_array().map(Vec::len), Some(3));
    Ok(())
}

#[tokio::test]
async fn test_mirror_failure_does_not_fail_save() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let mut loader = loader_with(&dir, Arc::new(NoMirrorIo));
    loader.set_additional_save_to_text(true);
    let catalog = sample_catalog();
    let path = dir.path().join("mirrorless.ap");

    loader.save(&catalog, &path).await?;

    assert!(!text_mirror_path(&path).exists());
    assert_eq!(persisted_shape(&loader.load(&path).await?), persisted_shape(&catalog));
    Ok(())
}

#[tokio::test]
async fn test_payloads_round_trip() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let loader = loader_with(&dir, Arc::new(TokioFileIo));
    let catalog = sample_catalog();
    let with_data = catalog
        .find_by_path(&LogicalPath::from("engine:props/crate.albedo"))
        .map(|entry| entry.id)
        .expect("sample has an albedo entry");
    let shader = catalog
        .find_by_path(&LogicalPath::from("engine:props/crate.shader"))
        .map(|entry| entry.id)
        .expect("sample has a shader entry");
    let payloads = HashMap::from([
        (with_data, vec![0xAB; 64]),
        (shader, b"fn main() {}".to_vec()),
    ]);
    let path = dir.path().join("engine/props/crate.ap");

    let written = loader.save_with_payloads(&catalog, &payloads, &path).await?;
    let loaded = loader.load(&path).await?;
    assert_eq!(persisted_shape(&loaded), persisted_shape(&written));

    for (id, expected) in &payloads {
        let entry = loaded.get(id).expect("payload entry is in the catalog");
        let bytes = loader.read_payload(&path, entry, IoPriority::High).await?;
        assert_eq!(&bytes, expected);
    }

    let bare = loaded
        .iter()
        .find(|entry| !payloads.contains_key(&entry.id))
        .expect("one entry has no payload");
    assert!(loader
        .read_payload(&path, bare, IoPriority::Low)
        .await?
        .is_empty());
    Ok(())
}

#[tokio::test]
async fn test_payload_past_end_of_file_is_truncated() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let loader = loader_with(&dir, Arc::new(TokioFileIo));
    let id = AssetGuid::new();
    let catalog: PackageCatalog = [CatalogEntry::new(id, "project:data/blob.bin")]
        .into_iter()
        .collect();
    let path = dir.path().join("blob.ap");

    let written = loader
        .save_with_payloads(&catalog, &HashMap::from([(id, vec![1; 32])]), &path)
        .await?;
    let mut bytes = std::fs::read(&path)?;
    bytes.truncate(bytes.len() - 10);
    std::fs::write(&path, &bytes)?;

    let entry = written.get(&id).expect("entry was written");
    let result = loader.read_payload(&path, entry, IoPriority::Normal).await;

    assert!(matches!(
        result,
        Err(LoadError::Truncated {
            stage: LoadStage::ReadingPayload,
            expected: 32,
            actual: 22,
            ..
        })
    ));
    Ok(())
}

#[tokio::test]
async fn test_load_logical_through_every_root() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let loader = loader_with(&dir, Arc::new(TokioFileIo));

    for object in [
        "engine:textures/stone.albedo",
        "project:maps/level01.terrain",
        "terrain:biomes/forest.grass",
    ] {
        let object = LogicalPath::from(object);
        let file = loader
            .resolve_file_path(&object)
            .expect("known assemblies resolve");
        let id = AssetGuid::new_v5(object.as_str());
        let catalog: PackageCatalog = [CatalogEntry::new(id, object.clone())]
            .into_iter()
            .collect();

        loader.save(&catalog, &file).await?;
        let loaded = loader.load_logical(&object).await?;

        assert!(loaded.contains(&id));
    }

    assert!(dir.path().join("plugins/terrain/biomes/forest.ap").is_file());
    Ok(())
}

#[tokio::test]
async fn test_unknown_assembly_is_unresolved() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let io = Arc::new(CountingIo::default());
    let loader = loader_with(&dir, io.clone());
    let object = LogicalPath::from("water:rivers/delta.mesh");

    let result = loader.load_logical(&object).await;

    assert!(matches!(result, Err(LoadError::Unresolved(p)) if p == object));
    assert_eq!(io.reads.load(Ordering::SeqCst), 0);
    Ok(())
}

#[tokio::test]
async fn test_independent_packages_load_concurrently() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let loader = Arc::new(loader_with(&dir, Arc::new(TokioFileIo)));

    let mut expected = Vec::new();
    for index in 0..8 {
        let catalog = sample_catalog();
        let path = dir.path().join(format!("project/batch/pack{index}.ap"));
        loader.save(&catalog, &path).await?;
        expected.push((path, persisted_shape(&catalog)));
    }

    let handles: Vec<_> = expected
        .iter()
        .map(|(path, _)| {
            let loader = loader.clone();
            let path: PathBuf = path.clone();
            tokio::spawn(async move { loader.load(&path).await })
        })
        .collect();

    for (handle, (_, shape)) in handles.into_iter().zip(&expected) {
        let loaded = handle.await??;
        assert_eq!(&persisted_shape(&loaded), shape);
    }
    Ok(())
}

#[tokio::test]
async fn test_manager_over_configured_loader() -> Result<()> {
    let dir = tempfile::tempdir()?;
    std::fs::write(
        dir.path().join(StorageConfig::FILE_NAME),
        "engine_root = \"data/engine\"\nadditional_save_to_text = true\n",
    )?;
    let config = StorageConfig::load(&dir.path().join(StorageConfig::FILE_NAME))?;
    let loader = config.into_loader(Arc::new(TokioFileIo));
    assert!(loader.additional_save_to_text());

    let object = LogicalPath::from("engine:ui/hud.layout");
    let id = AssetGuid::new_v5(object.as_str());
    let catalog: PackageCatalog = [CatalogEntry::new(id, object.clone())].into_iter().collect();
    let file = loader
        .resolve_file_path(&object)
        .expect("engine assembly resolves");
    assert_eq!(file, dir.path().join("data/engine/ui/hud.ap"));
    loader.save(&catalog, &file).await?;
    assert!(text_mirror_path(&file).is_file());

    let mut manager = AssetManager::new(loader);
    assert_eq!(manager.load_package(&object).await?, 1);
    assert!(manager.find_by_path(&object).is_none());

    assert!(manager.rebind_path(&id, object.clone()));
    assert_eq!(manager.find_by_path(&object).map(|entry| entry.id), Some(id));
    assert_eq!(manager.load_package(&object).await?, 0);
    Ok(())
}
