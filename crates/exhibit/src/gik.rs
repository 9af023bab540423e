//! Tables for the GIK booth exhibition.

use crate::config::ExhibitConfig;
use crate::directory::{BoothDescription, BoothDirectory};
use crate::symbology::{Category, CategoryTable};

pub fn categories() -> CategoryTable {
    CategoryTable::new(vec![
        Category::new('A', "#FFD700", "Smart Grid and Energy Management / SDG-7"),
        Category::new('B', "#87CEEB", "Wearable Health and Diagnosis / SDG-3"),
        Category::new('C', "#90EE90", "Public Safe and Culture / SDG-11"),
        Category::new('D', "#DDA0DD", "Smart Agriculture and Aquaculture / SDG-12"),
        Category::new('E', "#FFB6C1", "Climate and Waste Management / SDG-12"),
        Category::new('F', "#FFD700", "National Heritage and Conservation / SDG-15"),
    ])
}

pub fn descriptions() -> BoothDirectory {
    [
        ("A-01", "IoT for Monitoring", "Real-time energy monitoring system"),
        ("A-02", "Smart Pot", "Intelligent plant monitoring device"),
        ("B-01", "Health Monitor Band", "Wearable vital signs tracker"),
        ("C-01", "Safety Alert System", "Emergency notification platform"),
        ("D-01", "Crop Monitor System", "IoT sensor network for crops"),
        (
            "D-02",
            "H.A.R.V.E.S.T",
            "Humidity-based And Regulation for Vegetation, Environment, Soil, and Temperature",
        ),
        ("E-01", "Air Quality Monitor", "Real-time pollution monitoring"),
        ("F-01", "Heritage Database", "Digital archive of artifacts"),
    ]
    .into_iter()
    .map(|(code, title, desc)| (code.to_string(), BoothDescription::new(title, desc)))
    .collect()
}

pub fn exhibit() -> ExhibitConfig {
    ExhibitConfig::new(categories(), descriptions())
}
