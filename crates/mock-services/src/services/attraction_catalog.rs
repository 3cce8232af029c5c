//! 模拟景点目录
//!
//! 内置 26 个美国景点，构造时生成景点 ID，之后的每次查询返回同一份有序列表。

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};

use tour_guide::{Attraction, CatalogProvider, ProviderError};

/// 内置景点：(名称, 城市, 州, 纬度, 经度)
const STOCK_ATTRACTIONS: [(&str, &str, &str, f64, f64); 26] = [
    ("Disneyland", "Anaheim", "CA", 33.817595, -117.922008),
    ("Jackson Hole", "Jackson Hole", "WY", 43.582767, -110.821999),
    ("Mojave National Preserve", "Kelso", "CA", 35.141689, -115.510399),
    ("Joshua Tree National Park", "Joshua Tree National Park", "CA", 33.881866, -115.90065),
    ("Buffalo National River", "St Joe", "AR", 35.985512, -92.757652),
    ("Hot Springs National Park", "Hot Springs", "AR", 34.52153, -93.042267),
    ("Kartchner Caverns State Park", "Benson", "AZ", 31.837551, -110.347382),
    ("Legend Valley", "Thornville", "OH", 39.937778, -82.40667),
    ("Flatiron Building", "New York City", "NY", 40.741112, -73.989723),
    ("Fallingwater", "Mill Run", "PA", 39.906113, -79.468056),
    ("Union Station", "Washington D.C.", "DC", 38.897095, -77.006332),
    ("Roger Dean Stadium", "Jupiter", "FL", 26.890959, -80.116577),
    ("Texas Memorial Stadium", "Austin", "TX", 30.283682, -97.732536),
    ("Bryant-Denny Stadium", "Tuscaloosa", "AL", 33.208973, -87.550438),
    ("Tiger Stadium", "Baton Rouge", "LA", 30.412035, -91.183815),
    ("Neyland Stadium", "Knoxville", "TN", 35.955013, -83.925011),
    ("Kyle Field", "College Station", "TX", 30.61025, -96.339844),
    ("San Diego Zoo", "San Diego", "CA", 32.735317, -117.149048),
    ("Zoo Tampa at Lowry Park", "Tampa", "FL", 28.012804, -82.469269),
    ("Franklin Park Zoo", "Boston", "MA", 42.302601, -71.086731),
    ("El Paso Zoo", "El Paso", "TX", 31.769125, -106.44487),
    ("Kansas City Zoo", "Kansas City", "MO", 39.007504, -94.529625),
    ("Bronx Zoo", "Bronx", "NY", 40.852905, -73.872971),
    ("Cinderella Castle", "Orlando", "FL", 28.419411, -81.5812),
    ("McKinley Tower", "Anchorage", "AK", 61.218887, -149.877502),
    ("Space Needle", "Seattle", "WA", 47.620422, -122.349358),
];

/// 静态景点目录
#[derive(Debug)]
pub struct StaticAttractionCatalog {
    attractions: Vec<Attraction>,
    simulate_failure: AtomicBool,
    requests: AtomicU64,
}

impl Default for StaticAttractionCatalog {
    fn default() -> Self {
        Self::stock()
    }
}

impl StaticAttractionCatalog {
    /// 内置的 26 个景点
    pub fn stock() -> Self {
        let attractions = STOCK_ATTRACTIONS
            .iter()
            .map(|&(name, city, state, latitude, longitude)| {
                Attraction::new(name, city, state, latitude, longitude)
            })
            .collect();
        Self::with_attractions(attractions)
    }

    /// 使用自定义景点列表
    pub fn with_attractions(attractions: Vec<Attraction>) -> Self {
        Self {
            attractions,
            simulate_failure: AtomicBool::new(false),
            requests: AtomicU64::new(0),
        }
    }

    /// 目录中的景点（不计入请求次数）
    pub fn attractions(&self) -> &[Attraction] {
        &self.attractions
    }

    pub fn set_simulate_failure(&self, should_fail: bool) {
        self.simulate_failure.store(should_fail, Ordering::SeqCst);
    }

    pub fn request_count(&self) -> u64 {
        self.requests.load(Ordering::Relaxed)
    }
}

impl CatalogProvider for StaticAttractionCatalog {
    fn list_attractions(&self) -> Result<Vec<Attraction>, ProviderError> {
        self.requests.fetch_add(1, Ordering::Relaxed);
        if self.simulate_failure.load(Ordering::SeqCst) {
            return Err(ProviderError::Unavailable(
                "attraction catalog temporarily unavailable".to_string(),
            ));
        }
        Ok(self.attractions.clone())
    }
}
