/// Level count bounds shared by every tiled map
const LEVEL_COUNT_RANGE: (u32, u32) = (1, 16);

/// Tile size bounds, in texels
const TILE_SIZE_RANGE: (u32, u32) = (128, 8192);

/// Globe base map served as tiles by a Web Map Service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TiledMap {
    Wms {
        layer: String,
        level_count: u32,
        tile_size: u32,
    },
    /// A coarse base layer refined by a detail layer at deeper levels.
    MultiWms {
        base_layer: String,
        base_level_count: u32,
        detail_layer: String,
        detail_level_count: u32,
        tile_size: u32,
    },
}

fn clamp_levels(levels: i64) -> u32 {
    levels.clamp(LEVEL_COUNT_RANGE.0 as i64, LEVEL_COUNT_RANGE.1 as i64) as u32
}

fn clamp_tile_size(size: i64) -> u32 {
    size.clamp(TILE_SIZE_RANGE.0 as i64, TILE_SIZE_RANGE.1 as i64) as u32
}

impl TiledMap {
    /// Level count is clamped to 1–16 and tile size to 128–8192.
    pub fn wms(layer: &str, level_count: i64, tile_size: i64) -> Self {
        TiledMap::Wms {
            layer: layer.to_string(),
            level_count: clamp_levels(level_count),
            tile_size: clamp_tile_size(tile_size),
        }
    }

    /// Like [`TiledMap::wms`]; the detail level count is raised to at least one more
    /// than the base level count, even past 16.
    pub fn multi_wms(
        base_layer: &str,
        base_level_count: i64,
        detail_layer: &str,
        detail_level_count: i64,
        tile_size: i64,
    ) -> Self {
        let base_level_count = clamp_levels(base_level_count);
        let detail_level_count = detail_level_count
            .min(LEVEL_COUNT_RANGE.1 as i64)
            .max(base_level_count as i64 + 1) as u32;
        TiledMap::MultiWms {
            base_layer: base_layer.to_string(),
            base_level_count,
            detail_layer: detail_layer.to_string(),
            detail_level_count,
            tile_size: clamp_tile_size(tile_size),
        }
    }
}

#[cfg(test)]
mod tiled_map_test {
    use super::*;

    #[test]
    fn test_wms_clamps() {
        assert_eq!(
            TiledMap::wms("bmng", 40, 16),
            TiledMap::Wms {
                layer: "bmng".into(),
                level_count: 16,
                tile_size: 128
            }
        );
        assert_eq!(
            TiledMap::wms("bmng", -3, 100_000),
            TiledMap::Wms {
                layer: "bmng".into(),
                level_count: 1,
                tile_size: 8192
            }
        );
    }

    #[test]
    fn test_multi_wms_detail_levels() {
        match TiledMap::multi_wms("base", 16, "detail", 4, 512) {
            TiledMap::MultiWms {
                base_level_count,
                detail_level_count,
                tile_size,
                ..
            } => {
                assert_eq!(base_level_count, 16);
                assert_eq!(detail_level_count, 17);
                assert_eq!(tile_size, 512);
            }
            other => panic!("unexpected map {other:?}"),
        }
    }
}
