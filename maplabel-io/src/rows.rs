use serde::{Deserialize, Deserializer};

/// One row of `Countries.csv`: `name,abbreviation,zoom,land area
/// km,population,latitude,longitude`, `excel` dialect.
#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct CountryRow {
    pub name: String,
    pub abbreviation: String,
    pub zoom: u8,
    #[serde(rename = "land area km")]
    pub land_area_km: f64,
    pub population: u64,
    pub latitude: f64,
    pub longitude: f64,
}

/// One row of a city input file: `name,zoom,population,geonameid,
/// latitude,longitude`, `excel-tab` dialect, optionally gzip-compressed.
#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct CityRow {
    pub name: String,
    pub zoom: u8,
    #[serde(deserialize_with = "population_or_none")]
    pub population: Option<u64>,
    pub geonameid: String,
    pub latitude: f64,
    pub longitude: f64,
}

/// An unparseable population (including empty) means "unknown", not a
/// row-level error: the original loader caught exactly this `ValueError`
/// and fell back to the smallest font tier.
fn population_or_none<'de, D>(deserializer: D) -> Result<Option<u64>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    Ok(raw.trim().parse::<u64>().ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn country_row_parses_from_csv() {
        let csv = "name,abbreviation,zoom,land area km,population,latitude,longitude\n\
                    Poland,PL,3,312696,37950000,52.0,19.0\n";
        let mut reader = csv::Reader::from_reader(csv.as_bytes());
        let row: CountryRow = reader.deserialize().next().unwrap().unwrap();
        assert_eq!(row.name, "Poland");
        assert_eq!(row.zoom, 3);
        assert_eq!(row.population, 37_950_000);
    }

    #[test]
    fn city_row_tolerates_missing_population() {
        let tsv = "name\tzoom\tpopulation\tgeonameid\tlatitude\tlongitude\n\
                    Nowhere\t5\t\t12345\t10.0\t10.0\n";
        let mut reader = csv::ReaderBuilder::new()
            .delimiter(b'\t')
            .from_reader(tsv.as_bytes());
        let row: CityRow = reader.deserialize().next().unwrap().unwrap();
        assert_eq!(row.population, None);
    }

    #[test]
    fn city_row_parses_population_when_present() {
        let tsv = "name\tzoom\tpopulation\tgeonameid\tlatitude\tlongitude\n\
                    Warsaw\t3\t1790658\t756135\t52.23\t21.01\n";
        let mut reader = csv::ReaderBuilder::new()
            .delimiter(b'\t')
            .from_reader(tsv.as_bytes());
        let row: CityRow = reader.deserialize().next().unwrap().unwrap();
        assert_eq!(row.population, Some(1_790_658));
    }
}
