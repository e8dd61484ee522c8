use std::sync::Arc;

use futures::future::join_all;

use rapidfire_core::assets::{AssetHandle, AssetMap, AudioAsset, ImageAsset};
use rapidfire_core::manifest::{AssetKind, GameDescriptor, classify_asset};

use crate::store::GameStore;

/// Load and decode every declared asset of one game, best-effort.
///
/// Each sub-load is awaited independently; a failed or undecodable asset
/// is logged and omitted from the result, never failing the batch. Assets
/// with an unrecognized extension are skipped with a warning. Returns once
/// all dispatched loads have settled.
pub async fn load_assets<S: GameStore>(store: &S, descriptor: &GameDescriptor) -> AssetMap {
    let mut loads = Vec::new();
    for spec in &descriptor.assets {
        let filename = spec.filename().to_string();
        let Some(kind) = classify_asset(&filename) else {
            tracing::warn!(
                game = %descriptor.name,
                asset = %filename,
                "unrecognized asset extension, skipping"
            );
            continue;
        };
        let options = spec.options();
        let game = descriptor.name.clone();
        loads.push(async move {
            let result = store.fetch_asset(&game, &filename).await;
            (filename, kind, options, result)
        });
    }

    let mut map = AssetMap::new();
    for (filename, kind, options, result) in join_all(loads).await {
        let bytes = match result {
            Ok(bytes) => bytes,
            Err(e) => {
                tracing::error!(
                    game = %descriptor.name,
                    asset = %filename,
                    error = %e,
                    "failed to fetch asset"
                );
                continue;
            },
        };
        match kind {
            AssetKind::Image => match decode_image(&bytes) {
                Ok(image) => {
                    map.insert(filename, AssetHandle::Image(Arc::new(image)));
                },
                Err(e) => tracing::error!(
                    game = %descriptor.name,
                    asset = %filename,
                    error = %e,
                    "failed to decode image"
                ),
            },
            AssetKind::Audio => {
                map.insert(filename, AssetHandle::Audio(Arc::new(AudioAsset { bytes, options })));
            },
        }
    }
    map
}

fn decode_image(bytes: &[u8]) -> Result<ImageAsset, image::ImageError> {
    let decoded = image::load_from_memory(bytes)?.to_rgba8();
    Ok(ImageAsset {
        width: decoded.width(),
        height: decoded.height(),
        rgba: decoded.into_raw(),
    })
}
