use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, PoisonError};

use anyhow::anyhow;
use tokio::sync::mpsc;
use tracing::info;

use ndb_index::{Pair, Tree};
use ndb_ingest::{ChunkReader, LineProcessor};

use crate::error::{LoadError, Result};
use crate::models::{Food, FoodGroup, Nutrient};
use crate::schema::{self, Table};

type SharedFoods = Arc<Mutex<HashMap<String, Food>>>;

/// The loaded database plus its food-name search index.
///
/// Loading mutates shared state from many chunk workers; once
/// [`AsciiDb::read_database`] returns the value is only read.
#[derive(Debug)]
pub struct AsciiDb {
    base_path: PathBuf,
    pub food_groups: Vec<FoodGroup>,
    pub nutrients: Vec<Nutrient>,
    pub foods: HashMap<String, Food>,
    search_tree: Tree,
}

impl AsciiDb {
    pub async fn read_database(base: impl AsRef<Path>, reader: &ChunkReader) -> Result<Self> {
        let base = base.as_ref();

        info!("Loading food groups");
        let mut food_groups = collect_rows(reader, base, Table::FoodGroups, schema::parse_food_group).await?;
        food_groups.sort_by_key(|g| g.group_code);

        info!("Loading nutrient definitions");
        let mut nutrients = collect_rows(reader, base, Table::NutrientDefinitions, schema::parse_nutrient).await?;
        nutrients.sort_by_key(|n| n.nutrient_id);

        info!("Loading food database");
        let foods: SharedFoods = Arc::new(Mutex::new(HashMap::with_capacity(8000)));
        let search_tree = read_foods(reader, base, &foods).await?;

        info!("Loading food nutrients information");
        let nutrients_of = attach(&foods, schema::parse_food_nutrient, |food, n| food.nutrients.push(n));
        read_table(reader, base, Table::FoodNutrients, nutrients_of).await?;

        info!("Loading weight information");
        let weights_of = attach(&foods, schema::parse_weight, |food, w| food.weights.push(w));
        read_table(reader, base, Table::Weights, weights_of).await?;

        let foods = std::mem::take(&mut *foods.lock().unwrap_or_else(PoisonError::into_inner));
        info!(foods = foods.len(), terms = search_tree.key_count(), "Database loaded");

        Ok(Self { base_path: base.to_path_buf(), food_groups, nutrients, foods, search_tree })
    }

    pub fn base_path(&self) -> &Path {
        &self.base_path
    }

    pub fn food(&self, ndb_id: &str) -> Option<&Food> {
        self.foods.get(ndb_id)
    }

    /// NDB ids of foods indexed under exactly `term`. Terms are stored
    /// lowercased; normalizing the query is up to the caller.
    pub fn find_food(&self, term: &str) -> Option<&[String]> {
        self.search_tree.find(term)
    }

    pub fn search_index(&self) -> &Tree {
        &self.search_tree
    }

    /// Rebuild the search index from the loaded foods, visiting them in id order.
    pub fn rebuild_search_index(&mut self) {
        let mut ids: Vec<&String> = self.foods.keys().collect();
        ids.sort();
        let mut tree = Tree::new();
        for id in ids {
            for pair in schema::search_pairs(&self.foods[id]) {
                tree.insert(pair);
            }
        }
        self.search_tree = tree;
    }
}

async fn read_table<F>(reader: &ChunkReader, base: &Path, table: Table, processor: F) -> Result<()>
where
    F: LineProcessor + 'static,
{
    reader
        .read_file(base.join(table.file_name()), processor)
        .await
        .map(|_| ())
        .map_err(|source| LoadError::Table { table, source })
}

/// Parse every row of a small table into a vector; row order follows chunk completion.
async fn collect_rows<T, P>(reader: &ChunkReader, base: &Path, table: Table, parse: P) -> Result<Vec<T>>
where
    T: Send + 'static,
    P: Fn(&str) -> anyhow::Result<T> + Send + Sync + 'static,
{
    let rows = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&rows);
    read_table(reader, base, table, move |line: &str| -> anyhow::Result<()> {
        let row = parse(line)?;
        sink.lock().map_err(|_| anyhow!("{} row buffer poisoned", table.file_name()))?.push(row);
        Ok(())
    })
    .await?;
    let rows = std::mem::take(&mut *rows.lock().unwrap_or_else(PoisonError::into_inner));
    Ok(rows)
}

/// Parse FOOD_DES into `foods` while a single task inserts the search terms.
async fn read_foods(reader: &ChunkReader, base: &Path, foods: &SharedFoods) -> Result<Tree> {
    let (tx, mut rx) = mpsc::unbounded_channel::<Pair>();
    let builder = tokio::spawn(async move {
        let mut tree = Tree::new();
        while let Some(pair) = rx.recv().await {
            tree.insert(pair);
        }
        tree
    });

    let sink = Arc::clone(foods);
    let loaded = read_table(reader, base, Table::Foods, move |line: &str| -> anyhow::Result<()> {
        let food = schema::parse_food(line)?;
        for pair in schema::search_pairs(&food) {
            tx.send(pair).map_err(|_| anyhow!("search index builder has stopped"))?;
        }
        sink.lock().map_err(|_| anyhow!("food table poisoned"))?.insert(food.ndb_id.clone(), food);
        Ok(())
    })
    .await;

    // The processor, and with it the last sender, is gone once the read returns.
    let tree = builder.await?;
    loaded.map(|()| tree)
}

/// Processor for tables whose rows hang off an already-loaded food.
fn attach<T, P, A>(foods: &SharedFoods, parse: P, apply: A) -> impl LineProcessor + 'static
where
    T: 'static,
    P: Fn(&str) -> anyhow::Result<(String, T)> + Send + Sync + 'static,
    A: Fn(&mut Food, T) + Send + Sync + 'static,
{
    let foods = Arc::clone(foods);
    move |line: &str| -> anyhow::Result<()> {
        let (id, row) = parse(line)?;
        let mut foods = foods.lock().map_err(|_| anyhow!("food table poisoned"))?;
        let food = foods.get_mut(&id).ok_or_else(|| anyhow!("could not find food {}", id))?;
        apply(food, row);
        Ok(())
    }
}
