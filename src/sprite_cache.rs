//! GPU images for the shape masks, attached to parts after they spawn.
//!
//! Every entity carrying a [`ShapePart`] automatically receives the sprite image
//! for its kind shortly after spawning, via [`attach_shape_sprite_system`]
//! (which queries `Added<ShapePart>`).  The image is built from the
//! [`MaskCache`] the first time a `(kind, resolution)` pair is seen; afterwards
//! every part of that kind shares one handle.
//!
//! Spawning code only sets the sprite tint and a unit `custom_size`; the part's
//! `Transform` scale supplies the world size, so the sprite and the collider
//! are scaled by the same factor.

use crate::config::CreatureConfig;
use crate::primitive::ShapePart;
use crate::shape::{MaskCache, ShapeKind, ShapeMask};
use bevy::prelude::*;
use bevy::render::render_resource::{Extent3d, TextureDimension, TextureFormat};
use bevy_asset::RenderAssetUsages;
use std::collections::HashMap;

/// Image handle per `(kind, resolution)`, populated lazily.
#[derive(Resource, Debug, Default)]
pub struct ShapeSprites {
    handles: HashMap<(ShapeKind, u32), Handle<Image>>,
}

impl ShapeSprites {
    /// Handle for `(kind, resolution)`, creating the image on first use.
    pub fn handle_for(
        &mut self,
        kind: ShapeKind,
        resolution: u32,
        masks: &mut MaskCache,
        images: &mut Assets<Image>,
    ) -> Handle<Image> {
        self.handles
            .entry((kind, resolution))
            .or_insert_with(|| images.add(mask_image(masks.get_or_rasterize(kind, resolution))))
            .clone()
    }

    pub fn len(&self) -> usize {
        self.handles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handles.is_empty()
    }
}

/// White-on-transparent sRGB image of a mask; the sprite tint supplies color.
pub fn mask_image(mask: &ShapeMask) -> Image {
    let res = mask.resolution();
    Image::new(
        Extent3d {
            width: res,
            height: res,
            depth_or_array_layers: 1,
        },
        TextureDimension::D2,
        mask.to_rgba8(),
        TextureFormat::Rgba8UnormSrgb,
        RenderAssetUsages::RENDER_WORLD,
    )
}

// ── Spawn-time sprite attachment ──────────────────────────────────────────────

/// Give every newly spawned shape part the mask image for its kind.
pub fn attach_shape_sprite_system(
    mut query: Query<(&ShapePart, &mut Sprite), Added<ShapePart>>,
    mut sprites: ResMut<ShapeSprites>,
    mut masks: ResMut<MaskCache>,
    mut images: ResMut<Assets<Image>>,
    config: Res<CreatureConfig>,
) {
    for (part, mut sprite) in query.iter_mut() {
        sprite.image = sprites.handle_for(
            part.kind,
            config.mask_resolution,
            &mut masks,
            &mut images,
        );
    }
}
