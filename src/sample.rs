//! Sample catalog used by the demo binary and the integration tests.

use catalog_core::{Brand, Category, Price, Result};
use catalog_engine::CatalogService;

/// Nine brands, one product per category each
///
/// Prices follow `Category::ALL` order. Brand D has the cheapest package
/// (36,100); the cheapest product per category sums to 34,100.
pub const SAMPLE_BRANDS: [(&str, [Price; 8]); 9] = [
    ("A", [11_200, 5_500, 4_200, 9_000, 2_000, 1_700, 1_800, 2_300]),
    ("B", [10_500, 5_900, 3_800, 9_100, 2_100, 2_000, 2_000, 2_200]),
    ("C", [10_000, 6_200, 3_300, 9_200, 2_200, 1_900, 2_200, 2_100]),
    ("D", [10_100, 5_100, 3_000, 9_500, 2_500, 1_500, 2_400, 2_000]),
    ("E", [10_700, 5_000, 3_800, 9_900, 2_300, 1_800, 2_100, 2_100]),
    ("F", [11_200, 7_200, 4_000, 9_300, 2_100, 1_600, 2_300, 1_900]),
    ("G", [10_500, 5_800, 3_900, 9_000, 2_200, 1_700, 2_100, 2_000]),
    ("H", [10_800, 6_300, 3_100, 9_700, 2_100, 1_600, 2_000, 2_000]),
    ("I", [11_400, 6_700, 3_200, 9_500, 2_400, 1_700, 1_700, 2_400]),
];

/// Create every sample brand and its products through `service`
///
/// Returns the brands in creation order.
pub fn seed(service: &CatalogService) -> Result<Vec<Brand>> {
    let mut brands = Vec::with_capacity(SAMPLE_BRANDS.len());
    for (name, prices) in SAMPLE_BRANDS {
        let brand = service.create_brand(name)?;
        for (category, price) in Category::ALL.into_iter().zip(prices) {
            service.create_product(brand.id, category, price)?;
        }
        brands.push(brand);
    }
    Ok(brands)
}
