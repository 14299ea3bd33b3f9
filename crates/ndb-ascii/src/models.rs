//! Records of the nutrient database.

/// A food group such as "Dairy and Egg Products".
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FoodGroup {
    /// 4-digit group code.
    pub group_code: i32,
    pub description: String,
}

/// A macro- or micronutrient that is measured for foods.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Nutrient {
    /// 3-digit nutrient number.
    pub nutrient_id: i32,
    /// Unit of measure, e.g. "g" or "kcal".
    pub units: String,
    pub description: String,
}

/// A foodstuff whose nutritional content has been measured.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Food {
    /// 5-digit NDB number, kept as text to preserve leading zeros.
    pub ndb_id: String,
    pub food_group: i32,
    pub long_description: String,
    pub short_description: String,
    pub common_names: String,
    pub manufacturer: String,
    /// Inedible parts of the food, e.g. "Core and stem".
    pub refuse_description: String,
    /// Percentage of the food that is refuse.
    pub refuse: i32,
    pub nutrients: Vec<FoodNutrient>,
    pub weights: Vec<Weight>,
}

/// A measured nutrient value for a food, per 100 g edible portion.
#[derive(Debug, Clone, PartialEq)]
pub struct FoodNutrient {
    pub nutrient_id: i32,
    pub value: f32,
    /// Number of data points behind `value`.
    pub data_points: i32,
}

/// A household measure and its gram weight.
#[derive(Debug, Clone, PartialEq)]
pub struct Weight {
    pub sequence: i32,
    pub amount: f32,
    pub description: String,
    pub weight_g: f32,
}
