use clap::ValueEnum;
use serde::{Deserialize, Serialize};

/// Display language for labels and sentinels. Presentation-only; the pricing
/// core never sees it.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, ValueEnum, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    #[default]
    #[serde(alias = "english")]
    En,
    #[serde(alias = "malay", alias = "bm")]
    Ms,
}

/// One translation record per language, resolved once and never mutated.
#[derive(Copy, Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Labels {
    pub title: &'static str,
    pub list_price: &'static str,
    pub unit_cost: &'static str,
    pub discount: &'static str,
    pub target_margin: &'static str,
    pub net_price: &'static str,
    pub gross_profit_per_unit: &'static str,
    pub margin: &'static str,
    pub markup: &'static str,
    pub price_for_target_margin: &'static str,
    pub not_applicable: &'static str,
}

const EN: Labels = Labels {
    title: "Margin check",
    list_price: "List price",
    unit_cost: "Unit cost",
    discount: "Discount",
    target_margin: "Target margin",
    net_price: "Net price",
    gross_profit_per_unit: "Gross profit per unit",
    margin: "Margin",
    markup: "Markup",
    price_for_target_margin: "Price for target margin",
    not_applicable: "N/A",
};

const MS: Labels = Labels {
    title: "Semakan margin",
    list_price: "Harga senarai",
    unit_cost: "Kos seunit",
    discount: "Diskaun",
    target_margin: "Margin sasaran",
    net_price: "Harga bersih",
    gross_profit_per_unit: "Untung kasar seunit",
    margin: "Margin",
    markup: "Tokokan",
    price_for_target_margin: "Harga untuk margin sasaran",
    not_applicable: "T/B",
};

pub fn labels(language: Language) -> &'static Labels {
    match language {
        Language::En => &EN,
        Language::Ms => &MS,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn both_languages_resolve_to_distinct_tables() {
        let en = labels(Language::En);
        let ms = labels(Language::Ms);
        assert_eq!(en.not_applicable, "N/A");
        assert_ne!(en.net_price, ms.net_price);
        assert_ne!(en.title, ms.title);
    }

    #[test]
    fn language_keys_deserialize_with_aliases() {
        assert_eq!(
            serde_json::from_str::<Language>("\"en\"").unwrap(),
            Language::En
        );
        assert_eq!(
            serde_json::from_str::<Language>("\"malay\"").unwrap(),
            Language::Ms
        );
        assert_eq!(
            serde_json::from_str::<Language>("\"bm\"").unwrap(),
            Language::Ms
        );
        assert!(serde_json::from_str::<Language>("\"fr\"").is_err());
    }
}
