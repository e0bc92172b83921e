//! Country to continent / UN region derivation.
//!
//! A small static table covering the countries community submissions
//! actually produce. Lookup is case-insensitive on the trimmed country name;
//! anything unknown derives empty placeholders, which render fine and keep
//! the entry submittable.

/// Derived regional classification for an entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Regions {
    /// Continent name, empty when unknown.
    pub continent: String,
    /// UN sub-region name, empty when unknown.
    pub un_region: String,
}

/// Derives `(continent, un_region)` from a country name.
pub fn derive(country: &str) -> Regions {
    let (continent, un_region) = match country.trim().to_ascii_lowercase().as_str() {
        "usa" | "united states" | "united states of america" => {
            ("America", "Northern America")
        }
        "canada" => ("America", "Northern America"),
        "mexico" | "méxico" => ("America", "Central America"),
        "guatemala" | "costa rica" | "panama" => ("America", "Central America"),
        "cuba" | "jamaica" | "haiti" | "dominican republic" => ("America", "Caribbean"),
        "brazil" | "brasil" | "argentina" | "chile" | "colombia" | "peru" | "venezuela"
        | "ecuador" | "uruguay" | "bolivia" | "paraguay" => ("America", "South America"),
        "united kingdom" | "uk" | "ireland" | "iceland" | "norway" | "sweden" | "denmark"
        | "finland" | "estonia" | "latvia" | "lithuania" => ("Europe", "Northern Europe"),
        "france" | "germany" | "deutschland" | "netherlands" | "belgium" | "switzerland"
        | "austria" | "luxembourg" | "monaco" => ("Europe", "Western Europe"),
        "spain" | "españa" | "portugal" | "italy" | "italia" | "greece" | "croatia"
        | "slovenia" | "serbia" | "albania" | "malta" => ("Europe", "Southern Europe"),
        "poland" | "czech republic" | "czechia" | "slovakia" | "hungary" | "romania"
        | "bulgaria" | "ukraine" | "belarus" | "moldova" | "russia"
        | "russian federation" => ("Europe", "Eastern Europe"),
        "china" | "japan" | "south korea" | "republic of korea" | "north korea" | "taiwan"
        | "mongolia" => ("Asia", "Eastern Asia"),
        "india" | "pakistan" | "bangladesh" | "sri lanka" | "nepal" | "afghanistan"
        | "iran" => ("Asia", "Southern Asia"),
        "thailand" | "vietnam" | "viet nam" | "indonesia" | "malaysia" | "singapore"
        | "philippines" | "myanmar" | "cambodia" | "laos" => ("Asia", "South-eastern Asia"),
        "turkey" | "türkiye" | "israel" | "saudi arabia" | "united arab emirates" | "iraq"
        | "jordan" | "lebanon" | "syria" | "qatar" | "kuwait" | "oman" | "yemen"
        | "georgia" | "armenia" | "azerbaijan" => ("Asia", "Western Asia"),
        "kazakhstan" | "uzbekistan" | "turkmenistan" | "kyrgyzstan" | "tajikistan" => {
            ("Asia", "Central Asia")
        }
        "egypt" | "morocco" | "algeria" | "tunisia" | "libya" | "sudan" => {
            ("Africa", "Northern Africa")
        }
        "nigeria" | "ghana" | "senegal" | "ivory coast" | "côte d'ivoire" | "mali" => {
            ("Africa", "Western Africa")
        }
        "kenya" | "ethiopia" | "tanzania" | "uganda" | "rwanda" | "somalia"
        | "mozambique" | "madagascar" | "zimbabwe" | "zambia" => ("Africa", "Eastern Africa"),
        "south africa" | "namibia" | "botswana" => ("Africa", "Southern Africa"),
        "cameroon" | "democratic republic of the congo" | "angola" => {
            ("Africa", "Middle Africa")
        }
        "australia" | "new zealand" => ("Oceania", "Australia and New Zealand"),
        "fiji" | "papua new guinea" => ("Oceania", "Melanesia"),
        _ => ("", ""),
    };
    Regions {
        continent: continent.to_string(),
        un_region: un_region.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_common_countries() {
        assert_eq!(derive("USA").un_region, "Northern America");
        assert_eq!(derive("France").continent, "Europe");
        assert_eq!(derive("France").un_region, "Western Europe");
        assert_eq!(derive("Australia").un_region, "Australia and New Zealand");
        assert_eq!(derive("Japan").un_region, "Eastern Asia");
    }

    #[test]
    fn test_lookup_is_case_insensitive_and_trimmed() {
        assert_eq!(derive("  france  "), derive("France"));
        assert_eq!(derive("GERMANY").continent, "Europe");
    }

    #[test]
    fn test_unknown_country_derives_empty_placeholders() {
        let regions = derive("Atlantis");
        assert_eq!(regions.continent, "");
        assert_eq!(regions.un_region, "");
        assert_eq!(derive(""), regions);
    }
}
