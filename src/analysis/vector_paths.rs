//! PDF vector-path analysis: red symbol clusters and color-keyed lengths.
//!
//! Every page is analyzed on its own with the scale of its own paper format,
//! so pages can be processed in parallel. Results are merged in page order.

use super::length::LengthTable;
use super::walker::{walk, BlockTable, WalkOutput};
use crate::classify::{Category, Classifier};
use crate::config::EngineConfig;
use crate::io::pdf::{PdfDrawing, PdfPage};
use crate::source::{BlockSymbol, Geometry, GeometrySource, LengthPrimitive, SourceItem};
use crate::types::{ColorCategory, Vector2};
use crate::units::{resolve_page_units, ScaleInfo};
use rayon::prelude::*;

/// Sides differing by less than this share of the longer side count as square
const SQUARE_TOLERANCE: f64 = 0.4;

/// A painted path small and red enough to be part of a device symbol
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SymbolCandidate {
    pub center: Vector2,
    pub width: f64,
    pub height: f64,
    pub square: bool,
    pub page: usize,
}

/// Nearby candidates merged into one counted device
#[derive(Debug, Clone, PartialEq)]
pub struct SymbolCluster {
    /// Mean of the member centers
    pub center: Vector2,
    /// Mean of the members' (width + height) / 2
    pub avg_size: f64,
    pub members: usize,
    pub color: ColorCategory,
    pub page: usize,
}

/// Device-size band of a symbol cluster
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SizeBand {
    Small,
    Medium,
    Large,
}

impl SizeBand {
    pub const ALL: [SizeBand; 3] = [SizeBand::Small, SizeBand::Medium, SizeBand::Large];

    pub fn for_size(avg_size: f64, config: &EngineConfig) -> SizeBand {
        if avg_size < config.small_band_limit {
            SizeBand::Small
        } else if avg_size < config.large_band_limit {
            SizeBand::Medium
        } else {
            SizeBand::Large
        }
    }

    pub fn layer(&self) -> &'static str {
        match self {
            SizeBand::Small => "PDF_RED_SMALL",
            SizeBand::Medium => "PDF_RED_MEDIUM",
            SizeBand::Large => "PDF_RED_LARGE",
        }
    }

    pub fn block_name(&self) -> &'static str {
        match self {
            SizeBand::Small => "Erőátviteli szerelvény (kis)",
            SizeBand::Medium => "Erőátviteli szerelvény (közepes)",
            SizeBand::Large => "Elosztó / panel",
        }
    }

    /// Outlets and switches are small, luminaires medium, boards large
    pub fn category(&self) -> Category {
        match self {
            SizeBand::Small => Category::Socket,
            SizeBand::Medium => Category::Luminaire,
            SizeBand::Large => Category::Panel,
        }
    }

    pub fn from_layer(layer: &str) -> Option<SizeBand> {
        Self::ALL.into_iter().find(|band| band.layer() == layer)
    }
}

/// Category a color key's length counts towards
pub fn color_length_category(color: ColorCategory) -> Category {
    match color {
        ColorCategory::Red => Category::Cable,
        ColorCategory::Cyan | ColorCategory::Blue => Category::CableTray,
        _ => Category::Other,
    }
}

/// Red paths of a page whose bounds fall in the symbol size range
pub fn symbol_candidates(page: &PdfPage, config: &EngineConfig) -> Vec<SymbolCandidate> {
    page.paths
        .iter()
        .filter(|path| path.is_red())
        .filter_map(|path| {
            let bounds = path.bounds()?;
            let (width, height) = (bounds.width(), bounds.height());
            if !config.is_symbol_size(width, height) {
                return None;
            }
            Some(SymbolCandidate {
                center: bounds.center(),
                width,
                height,
                square: (width - height).abs() < width.max(height) * SQUARE_TOLERANCE,
                page: page.index,
            })
        })
        .collect()
}

/// Greedy clustering: each unassigned candidate seeds a cluster and pulls in
/// every later unassigned candidate closer than `threshold` on both axes
pub fn cluster_candidates(candidates: &[SymbolCandidate], threshold: f64) -> Vec<SymbolCluster> {
    let mut assigned = vec![false; candidates.len()];
    let mut clusters = Vec::new();

    for (i, seed) in candidates.iter().enumerate() {
        if assigned[i] {
            continue;
        }
        assigned[i] = true;
        let mut members = vec![seed];
        for (j, other) in candidates.iter().enumerate().skip(i + 1) {
            if !assigned[j] && seed.center.chebyshev_distance(&other.center) < threshold {
                assigned[j] = true;
                members.push(other);
            }
        }

        let n = members.len() as f64;
        let sum = members
            .iter()
            .fold(Vector2::ZERO, |acc, m| acc + m.center);
        let avg_size = members
            .iter()
            .map(|m| (m.width + m.height) / 2.0)
            .sum::<f64>()
            / n;
        clusters.push(SymbolCluster {
            center: sum / n,
            avg_size,
            members: members.len(),
            color: ColorCategory::Red,
            page: seed.page,
        });
    }
    clusters
}

/// One counted symbol per cluster, named and layered by size band
pub fn band_symbols(clusters: &[SymbolCluster], config: &EngineConfig) -> Vec<BlockSymbol> {
    clusters
        .iter()
        .map(|cluster| {
            let band = SizeBand::for_size(cluster.avg_size, config);
            BlockSymbol {
                name: band.block_name().to_string(),
                layer: band.layer().to_string(),
                count: 1,
                positions: vec![cluster.center],
            }
        })
        .collect()
}

/// A page whose red symbol candidates are already clustered.
///
/// Clustering needs every candidate of the page, so it runs before the walk;
/// the walk then sees one symbol per cluster next to the page's paths.
pub struct ClusteredPage<'a> {
    page: &'a PdfPage,
    clusters: Vec<SymbolCluster>,
}

impl<'a> ClusteredPage<'a> {
    pub fn new(page: &'a PdfPage, config: &EngineConfig) -> Self {
        let clusters = cluster_candidates(&symbol_candidates(page, config), config.cluster_threshold);
        Self { page, clusters }
    }

    pub fn clusters(&self) -> &[SymbolCluster] {
        &self.clusters
    }

    pub fn into_clusters(self) -> Vec<SymbolCluster> {
        self.clusters
    }
}

impl GeometrySource for ClusteredPage<'_> {
    fn items(&self, config: &EngineConfig) -> Box<dyn Iterator<Item = SourceItem<'_>> + '_> {
        let symbols = band_symbols(&self.clusters, config)
            .into_iter()
            .map(SourceItem::Symbol);
        let lengths = self.page.paths.iter().map(|path| {
            let key = path.color_key();
            SourceItem::Length(LengthPrimitive {
                key: key.to_string(),
                category: Some(color_length_category(key.category)),
                geometry: Geometry::Path(&path.segments),
            })
        });
        Box::new(symbols.chain(lengths))
    }
}

/// Analysis of one page
#[derive(Debug, Clone)]
pub struct PageAnalysis {
    pub index: usize,
    pub scale: ScaleInfo,
    pub clusters: Vec<SymbolCluster>,
    pub blocks: BlockTable,
    /// Keyed by color key, converted with this page's scale
    pub lengths: LengthTable,
}

pub fn analyze_page(page: &PdfPage, classifier: &Classifier, config: &EngineConfig) -> PageAnalysis {
    let scale = resolve_page_units(page.width, page.height);
    let source = ClusteredPage::new(page, config);
    let WalkOutput { blocks, lengths } = walk(&source, classifier, scale.factor, config);
    let clusters = source.into_clusters();
    log::debug!(
        "page {}: {} ({}), {} clusters, {} color keys",
        page.index + 1,
        scale.name,
        scale.detection_method,
        clusters.len(),
        lengths.len()
    );
    PageAnalysis {
        index: page.index,
        scale,
        clusters,
        blocks,
        lengths,
    }
}

/// Per-page analyses of a whole drawing, in page order
#[derive(Debug, Clone, Default)]
pub struct PdfAnalysis {
    pub pages: Vec<PageAnalysis>,
}

impl PdfAnalysis {
    /// Scale of the first page, reported for the drawing
    pub fn scale(&self) -> ScaleInfo {
        self.pages
            .first()
            .map_or_else(|| ScaleInfo::fallback(0), |p| p.scale.clone())
    }

    pub fn clusters(&self) -> impl Iterator<Item = &SymbolCluster> {
        self.pages.iter().flat_map(|p| p.clusters.iter())
    }

    pub fn cluster_count(&self) -> usize {
        self.pages.iter().map(|p| p.clusters.len()).sum()
    }

    pub fn blocks(&self, max_positions: usize) -> BlockTable {
        let mut blocks = BlockTable::new();
        for page in &self.pages {
            blocks.merge(page.blocks.clone(), max_positions);
        }
        blocks
    }

    pub fn lengths(&self) -> LengthTable {
        let mut lengths = LengthTable::new();
        for page in &self.pages {
            lengths.merge(page.lengths.clone());
        }
        lengths
    }

    /// Pages whose paper format differs from the first page
    pub fn mismatched_pages(&self) -> Vec<usize> {
        let Some(first) = self.pages.first() else {
            return Vec::new();
        };
        self.pages
            .iter()
            .filter(|p| p.scale.paper_format != first.scale.paper_format)
            .map(|p| p.index)
            .collect()
    }
}

/// Analyze every page; in parallel when configured
pub fn analyze(drawing: &PdfDrawing, classifier: &Classifier, config: &EngineConfig) -> PdfAnalysis {
    let mut pages: Vec<PageAnalysis> = if config.parallel_pages {
        drawing
            .pages
            .par_iter()
            .map(|page| analyze_page(page, classifier, config))
            .collect()
    } else {
        drawing
            .pages
            .iter()
            .map(|page| analyze_page(page, classifier, config))
            .collect()
    };
    pages.sort_by_key(|p| p.index);
    PdfAnalysis { pages }
}
