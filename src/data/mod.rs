/// Data layer: the close-approach pipeline.
///
/// Architecture:
/// ```text
///  cad.api (HTTP GET)  /  saved .json
///        │
///        ▼
///   ┌──────────┐
///   │  fetch    │  JSON body → CadTable (fields × rows)
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  derive   │  numeric distances, dist_delta, parsed cd → NeoDataset
///   └──────────┘
///        │            (memoized per request in `cache`)
///        ▼
///   ┌──────────┐
///   │  filter   │  FilterBounds → Partition { kept, excluded }
///   └──────────┘
///        │
///        ▼
///   summary / export / ui
/// ```

pub mod cache;
pub mod derive;
pub mod export;
pub mod fetch;
pub mod filter;
pub mod model;
pub mod summary;
