use std::sync::Arc;

use tracing::instrument;

use super::{PanelFragment, PanelKind, escape_html};
use crate::Result;
use crate::http::first_or_empty;
use crate::models::DishSummary;
use crate::providers::DishSource;

#[derive(Clone)]
pub struct DishPanel {
    source: Arc<dyn DishSource>,
}

impl DishPanel {
    pub fn new(source: Arc<dyn DishSource>) -> Self {
        Self { source }
    }

    /// Renders the first dish in provider order
    #[instrument(skip(self))]
    pub async fn render(&self, country: &str) -> Result<PanelFragment> {
        let dishes = self.source.dishes(country).await?;
        let dish = first_or_empty(dishes, "recipes", country)?;
        Ok(PanelFragment::new(PanelKind::Dish, to_html(&dish)))
    }
}

pub fn to_html(dish: &DishSummary) -> String {
    format!(
        "<h3>Famous Dish</h3>\n<p>{}</p>\n<img src=\"{}\" alt=\"{}\" width=\"100%\">",
        escape_html(&dish.name),
        escape_html(&dish.thumbnail_url),
        escape_html(&dish.name)
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ErrorKind;
    use async_trait::async_trait;

    struct FixedDishes(Vec<DishSummary>);

    #[async_trait]
    impl DishSource for FixedDishes {
        async fn dishes(&self, _country: &str) -> Result<Vec<DishSummary>> {
            Ok(self.0.clone())
        }
    }

    fn dish(name: &str) -> DishSummary {
        DishSummary {
            name: name.to_string(),
            thumbnail_url: format!("https://img/{name}.jpg"),
        }
    }

    #[tokio::test]
    async fn test_first_dish_is_rendered() {
        let dishes = FixedDishes(vec![dish("Ratatouille"), dish("Crepes")]);
        let panel = DishPanel::new(Arc::new(dishes));
        let fragment = panel.render("France").await.unwrap();
        assert_eq!(fragment.kind, PanelKind::Dish);
        assert!(fragment.html.contains("<p>Ratatouille</p>"));
        assert!(!fragment.html.contains("Crepes"));
    }

    #[tokio::test]
    async fn test_no_dishes_is_empty_result_set() {
        let panel = DishPanel::new(Arc::new(FixedDishes(Vec::new())));
        let err = panel.render("Atlantis").await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::EmptyResultSet);
    }
}
