//! Field layout of the ASCII dump and per-line record parsing.
//!
//! Fields are separated by `^`; text fields are wrapped in `~` and `~~` is an
//! empty value. Numeric fields are bare.
use anyhow::{bail, Context};

use ndb_index::Pair;

use crate::models::{Food, FoodGroup, FoodNutrient, Nutrient, Weight};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Table {
    FoodGroups,
    NutrientDefinitions,
    Foods,
    FoodNutrients,
    Weights,
}

impl Table {
    pub fn file_name(self) -> &'static str {
        match self {
            Table::FoodGroups => "FD_GROUP.txt",
            Table::NutrientDefinitions => "NUTR_DEF.txt",
            Table::Foods => "FOOD_DES.txt",
            Table::FoodNutrients => "NUT_DATA.txt",
            Table::Weights => "WEIGHT.txt",
        }
    }

    fn tag(self) -> &'static str {
        self.file_name().trim_end_matches(".txt")
    }

    fn field_count(self) -> usize {
        match self {
            Table::FoodGroups => 2,
            Table::NutrientDefinitions => 6,
            Table::Foods => 14,
            Table::FoodNutrients => 18,
            Table::Weights => 7,
        }
    }
}

/// Characters that separate search terms in food descriptions.
const TERM_SEPARATORS: &[char] = &[',', ' ', '&', '/', '!', '-', '.'];

/// Terms of this many bytes or fewer are not indexed.
const MIN_TERM_LEN: usize = 2;

pub fn split_record(line: &str, table: Table) -> anyhow::Result<Vec<&str>> {
    let parts: Vec<&str> = line.split('^').collect();
    if parts.len() != table.field_count() {
        bail!("expected {} parts, got {} from a {}", table.field_count(), parts.len(), table.tag());
    }
    Ok(parts)
}

/// Strip the `~` text delimiters.
pub fn trim_field(field: &str) -> &str {
    field.trim_matches('~')
}

pub fn parse_int(field: &str) -> anyhow::Result<i32> {
    let s = trim_field(field);
    s.parse().with_context(|| format!("invalid integer {:?}", s))
}

pub fn parse_float(field: &str) -> anyhow::Result<f32> {
    let s = trim_field(field);
    s.parse().with_context(|| format!("invalid number {:?}", s))
}

pub fn parse_food_group(line: &str) -> anyhow::Result<FoodGroup> {
    let parts = split_record(line, Table::FoodGroups)?;
    Ok(FoodGroup {
        group_code: parse_int(parts[0]).context("FD_GROUP group code")?,
        description: trim_field(parts[1]).to_string(),
    })
}

pub fn parse_nutrient(line: &str) -> anyhow::Result<Nutrient> {
    let parts = split_record(line, Table::NutrientDefinitions)?;
    Ok(Nutrient {
        nutrient_id: parse_int(parts[0]).context("NUTR_DEF nutrient id")?,
        units: trim_field(parts[1]).to_string(),
        description: trim_field(parts[3]).to_string(),
    })
}

pub fn parse_food(line: &str) -> anyhow::Result<Food> {
    let parts = split_record(line, Table::Foods)?;
    let food_group = parse_int(parts[1]).context("FOOD_DES food group")?;
    let refuse = match trim_field(parts[8]) {
        "" => 0,
        s => parse_int(s).context("FOOD_DES refuse")?,
    };
    Ok(Food {
        ndb_id: trim_field(parts[0]).to_string(),
        food_group,
        long_description: trim_field(parts[2]).to_string(),
        short_description: trim_field(parts[3]).to_string(),
        common_names: trim_field(parts[4]).to_string(),
        manufacturer: trim_field(parts[5]).to_string(),
        refuse_description: trim_field(parts[7]).to_string(),
        refuse,
        nutrients: Vec::new(),
        weights: Vec::new(),
    })
}

/// A NUT_DATA row: the owning food id and the measurement.
pub fn parse_food_nutrient(line: &str) -> anyhow::Result<(String, FoodNutrient)> {
    let parts = split_record(line, Table::FoodNutrients)?;
    let nutrient = FoodNutrient {
        nutrient_id: parse_int(parts[1]).context("NUT_DATA nutrient id")?,
        value: parse_float(parts[2]).context("NUT_DATA value")?,
        data_points: parse_int(parts[3]).context("NUT_DATA data points")?,
    };
    Ok((trim_field(parts[0]).to_string(), nutrient))
}

/// A WEIGHT row: the owning food id and the measure.
pub fn parse_weight(line: &str) -> anyhow::Result<(String, Weight)> {
    let parts = split_record(line, Table::Weights)?;
    let weight = Weight {
        sequence: parse_int(parts[1]).context("WEIGHT sequence")?,
        amount: parse_float(parts[2]).context("WEIGHT amount")?,
        description: trim_field(parts[3]).to_string(),
        weight_g: parse_float(parts[4]).context("WEIGHT gram weight")?,
    };
    Ok((trim_field(parts[0]).to_string(), weight))
}

/// Lowercased terms drawn from a food's descriptions, names and manufacturer.
/// Repeats are kept; a term seen twice scores twice at query time.
pub fn search_terms(food: &Food) -> Vec<String> {
    let joined = format!(
        "{} {} {} {}",
        food.long_description, food.short_description, food.common_names, food.manufacturer
    )
    .to_lowercase();
    joined
        .split(TERM_SEPARATORS)
        .filter(|term| term.len() > MIN_TERM_LEN)
        .map(str::to_string)
        .collect()
}

pub fn search_pairs(food: &Food) -> impl Iterator<Item = Pair> + '_ {
    search_terms(food).into_iter().map(move |term| Pair::new(term, food.ndb_id.clone()))
}
