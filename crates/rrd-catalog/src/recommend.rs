use rrd_api_types::{Intensity, Occasion, Product, QuizAnswers};

pub const MAX_RECOMMENDATIONS: usize = 3;

/// Family match, then intensity match, then occasion exclusion. Catalog order
/// is preserved and the result is truncated to [`MAX_RECOMMENDATIONS`].
pub(crate) fn recommend<'a>(products: &'a [Product], answers: &QuizAnswers) -> Vec<&'a Product> {
    let by_family = products
        .iter()
        .filter(|p| answers.family.is_none_or(|family| p.category == family));

    let by_intensity =
        by_family.filter(|p| answers.intensity.is_none_or(|intensity| p.intensity == intensity));

    let excluded = match answers.occasion {
        Some(Occasion::Daily) => Some(Intensity::Strong),
        Some(Occasion::Evening) => Some(Intensity::Light),
        Some(Occasion::Both) | None => None,
    };

    by_intensity
        .filter(|p| excluded != Some(p.intensity))
        .take(MAX_RECOMMENDATIONS)
        .collect()
}

#[cfg(test)]
mod tests {
    use crate::Catalog;
    use rrd_api_types::{Category, Intensity, Occasion, QuizAnswers};

    #[test]
    fn light_daily_fresh_draws_only_matching_tags() -> anyhow::Result<()> {
        let catalog = Catalog::rrd_collection()?;
        let answers = QuizAnswers {
            intensity: Some(Intensity::Light),
            occasion: Some(Occasion::Daily),
            family: Some(Category::Fresh),
        };

        let picks = catalog.recommend(&answers);
        assert!(picks.len() <= 3);
        assert!(!picks.is_empty());
        for p in &picks {
            assert_eq!(p.category, Category::Fresh);
            assert_eq!(p.intensity, Intensity::Light);
        }
        assert_eq!(picks[0].id, "acf");
        Ok(())
    }

    #[test]
    fn truncates_to_three_in_catalog_order() -> anyhow::Result<()> {
        let catalog = Catalog::rrd_collection()?;
        let answers = QuizAnswers {
            intensity: Some(Intensity::Strong),
            occasion: Some(Occasion::Both),
            family: Some(Category::Oriental),
        };

        let ids: Vec<&str> = catalog.recommend(&answers).into_iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, vec!["mkz", "ryl", "vgo"]);
        Ok(())
    }

    #[test]
    fn daily_wear_excludes_strong_scents() -> anyhow::Result<()> {
        let catalog = Catalog::rrd_collection()?;
        let answers = QuizAnswers {
            intensity: Some(Intensity::Strong),
            occasion: Some(Occasion::Daily),
            family: Some(Category::Floral),
        };

        assert!(catalog.recommend(&answers).is_empty());
        Ok(())
    }

    #[test]
    fn evening_excludes_light_scents() -> anyhow::Result<()> {
        let catalog = Catalog::rrd_collection()?;
        let answers = QuizAnswers {
            intensity: None,
            occasion: Some(Occasion::Evening),
            family: Some(Category::Fresh),
        };

        let ids: Vec<&str> = catalog.recommend(&answers).into_iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, vec!["bol"]);
        Ok(())
    }

    #[test]
    fn no_preferences_returns_first_three() -> anyhow::Result<()> {
        let catalog = Catalog::rrd_collection()?;
        let ids: Vec<&str> = catalog
            .recommend(&QuizAnswers::default())
            .into_iter()
            .map(|p| p.id.as_str())
            .collect();
        assert_eq!(ids, vec!["bol", "dvs", "mkz"]);
        Ok(())
    }
}
