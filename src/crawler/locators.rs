//! UI locators for the driven nutrition app
//!
//! The fixed element addresses the crawl engine interacts with: the search
//! input, the per-result expand marker, the detail page-ready marker, and
//! the six extraction fields.

use crate::backend::Locator;

const PKG: &str = "com.healthifyme.basic";

/// The search input field
pub fn search_input() -> Locator {
    Locator::xpath(format!(
        "//android.widget.EditText[@resource-id='{PKG}:id/et_search']"
    ))
}

/// Marker present once per search result row
pub fn result_marker() -> Locator {
    Locator::xpath(format!(
        "//android.widget.ImageView[@resource-id='{PKG}:id/iv_expand_icon']"
    ))
}

/// Marker that appears when the detail view has finished loading
pub fn detail_ready() -> Locator {
    Locator::xpath("//android.widget.TextView[@text='Macronutrients Breakdown']")
}

/// Item display name on the detail view
pub fn item_title() -> Locator {
    Locator::xpath(format!(
        "//android.widget.TextView[@resource-id='{PKG}:id/tv_item_title']"
    ))
}

/// Protein value field
pub fn proteins() -> Locator {
    Locator::id(format!("{PKG}:id/tv_protein_value"))
}

/// Carbohydrate value field
pub fn carbs() -> Locator {
    Locator::id(format!("{PKG}:id/tv_carbs_value"))
}

/// Fat value field
pub fn fats() -> Locator {
    Locator::id(format!("{PKG}:id/tv_fat_value"))
}

/// Fiber value field
pub fn fiber() -> Locator {
    Locator::id(format!("{PKG}:id/tv_fiber_value"))
}

/// Serving / portion details field
pub fn item_details() -> Locator {
    Locator::xpath(format!(
        "//android.widget.TextView[@resource-id='{PKG}:id/tv_item_details']"
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strategies() {
        assert_eq!(search_input().strategy(), "xpath");
        assert_eq!(result_marker().strategy(), "xpath");
        assert_eq!(proteins().strategy(), "id");
        assert_eq!(fiber().strategy(), "id");
    }

    #[test]
    fn test_values_reference_app_package() {
        for locator in [
            search_input(),
            result_marker(),
            item_title(),
            proteins(),
            carbs(),
            fats(),
            fiber(),
            item_details(),
        ] {
            assert!(
                locator.value().contains(PKG),
                "locator {locator} does not reference the app package"
            );
        }
    }
}
