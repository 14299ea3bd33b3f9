use std::fs;
use std::path::Path;

use tempfile::TempDir;

use ndb_ascii::{AsciiDb, LoadError, Table};
use ndb_ingest::{ChunkReader, IngestError, ReaderSettings};

fn row(fields: &[&str]) -> String {
    fields.join("^")
}

fn nut_data(id: &str, nutrient: &str, value: &str, points: &str) -> String {
    let id = format!("~{}~", id);
    let nutrient = format!("~{}~", nutrient);
    row(&[&id, &nutrient, value, points, "0.074", "~1~", "~~", "~~", "~~", "", "", "", "", "", "", "~~", "~11/1976~", "~~"])
}

fn write_table(dir: &Path, name: &str, rows: &[String]) {
    // The published dump uses CRLF framing.
    let body: String = rows.iter().map(|r| format!("{}\r\n", r)).collect();
    fs::write(dir.join(name), body).unwrap();
}

fn fixture_db() -> TempDir {
    let tmp = TempDir::new().unwrap();
    let dir = tmp.path();
    write_table(dir, "FD_GROUP.txt", &[
        "~0900~^~Fruits and Fruit Juices~".into(),
        "~0100~^~Dairy and Egg Products~".into(),
        "~0200~^~Spices and Herbs~".into(),
    ]);
    write_table(dir, "NUTR_DEF.txt", &[
        "~208~^~kcal~^~ENERC_KCAL~^~Energy~^~0~^~300~".into(),
        "~203~^~g~^~PROCNT~^~Protein~^~2~^~600~".into(),
        "~204~^~g~^~FAT~^~Total lipid (fat)~^~2~^~800~".into(),
    ]);
    write_table(dir, "FOOD_DES.txt", &[
        "~01001~^~0100~^~Butter, salted~^~BUTTER,WITH SALT~^~~^~~^~Y~^~~^0^~~^6.38^4.27^8.79^3.87".into(),
        "~01123~^~0100~^~Egg, whole, raw, fresh~^~EGG,WHL,RAW,FRSH~^~~^~~^~Y~^~Shell~^12^~~^6.25^4.36^9.02^3.68".into(),
        "~02001~^~0200~^~Spices, allspice, ground~^~ALLSPICE,GROUND~^~~^~~^~Y~^~~^0^~Pimenta dioica~^6.25^2.44^8.37^3.84".into(),
        "~09003~^~0900~^~Apples, raw, with skin~^~APPLES,RAW,WITH SKIN~^~~^~~^~Y~^~Core and stem~^10^~Malus domestica~^6.25^3.36^8.37^3.60".into(),
    ]);
    write_table(dir, "NUT_DATA.txt", &[
        nut_data("01001", "203", "0.85", "16"),
        nut_data("01001", "204", "81.11", "580"),
        nut_data("01123", "203", "12.56", "19"),
        nut_data("09003", "208", "52", "0"),
    ]);
    write_table(dir, "WEIGHT.txt", &[
        "~01001~^~1~^1^~pat (1\" sq, 1/3\" high)~^5.0^^".into(),
        "~01001~^~2~^1^~tbsp~^14.2^^".into(),
        "~09003~^~1~^1^~cup, quartered or chopped~^125^^".into(),
    ]);
    tmp
}

fn sorted(ids: Option<&[String]>) -> Vec<&str> {
    let mut ids: Vec<&str> = ids.unwrap_or_default().iter().map(String::as_str).collect();
    ids.sort_unstable();
    ids
}

async fn load(dir: &Path, chunk_size: usize) -> Result<AsciiDb, LoadError> {
    let reader = ChunkReader::new(ReaderSettings::default().with_chunk_size(chunk_size)).unwrap();
    AsciiDb::read_database(dir, &reader).await
}

#[tokio::test]
async fn loads_every_table() {
    let tmp = fixture_db();
    let db = load(tmp.path(), 64).await.expect("load");

    assert_eq!(db.base_path(), tmp.path());
    let groups: Vec<i32> = db.food_groups.iter().map(|g| g.group_code).collect();
    assert_eq!(groups, [100, 200, 900]);
    let nutrient_ids: Vec<i32> = db.nutrients.iter().map(|n| n.nutrient_id).collect();
    assert_eq!(nutrient_ids, [203, 204, 208]);
    assert_eq!(db.nutrients[2].units, "kcal");
    assert_eq!(db.foods.len(), 4);

    let butter = db.food("01001").expect("butter");
    assert_eq!(butter.long_description, "Butter, salted");
    assert_eq!(butter.food_group, 100);
    assert_eq!(butter.nutrients.len(), 2);
    assert_eq!(butter.weights.len(), 2);
    let mut sequences: Vec<i32> = butter.weights.iter().map(|w| w.sequence).collect();
    sequences.sort_unstable();
    assert_eq!(sequences, [1, 2]);

    let apples = db.food("09003").expect("apples");
    assert_eq!(apples.refuse, 10);
    assert_eq!(apples.refuse_description, "Core and stem");
    assert_eq!(apples.nutrients[0].nutrient_id, 208);
    assert!((apples.weights[0].weight_g - 125.0).abs() < f32::EPSILON);
}

#[tokio::test]
async fn food_names_are_searchable() {
    let tmp = fixture_db();
    let db = load(tmp.path(), 64).await.expect("load");

    assert_eq!(sorted(db.find_food("butter")), ["01001", "01001"]);
    assert_eq!(sorted(db.find_food("raw")), ["01123", "01123", "09003", "09003"]);
    assert_eq!(sorted(db.find_food("allspice")), ["02001", "02001"]);
    assert_eq!(sorted(db.find_food("skin")), ["09003", "09003"]);
    // Two-letter fragments and uppercase queries are not indexed.
    assert_eq!(db.find_food("or"), None);
    assert_eq!(db.find_food("Butter"), None);
}

#[tokio::test]
async fn rebuilt_index_matches_loaded_index() {
    let tmp = fixture_db();
    let mut db = load(tmp.path(), 4096).await.expect("load");
    let mut before: Vec<String> = db.search_index().in_order_tokens().map(str::to_string).collect();
    db.rebuild_search_index();
    let mut after: Vec<String> = db.search_index().in_order_tokens().map(str::to_string).collect();

    before.sort();
    after.sort();
    assert_eq!(before, after);
    assert_eq!(sorted(db.find_food("salted")), ["01001"]);
}

#[tokio::test]
async fn malformed_rows_fail_the_table_with_every_message() {
    let tmp = fixture_db();
    write_table(tmp.path(), "FOOD_DES.txt", &[
        "~01001~^~0100~^~Butter, salted~".into(),
        "~01002~^~01x0~^~Butter, whipped~^~BUTTER,WHIPPED~^~~^~~^~Y~^~~^0^~~^6.38^^^".into(),
    ]);
    let err = load(tmp.path(), 32).await.unwrap_err();
    match &err {
        LoadError::Table { table, source } => {
            assert_eq!(*table, Table::Foods);
            let messages = source.messages();
            assert_eq!(messages.len(), 2, "{:?}", messages);
            assert!(messages.iter().any(|m| m == "expected 14 parts, got 3 from a FOOD_DES"), "{:?}", messages);
            assert!(messages.iter().any(|m| m.starts_with("FOOD_DES food group: invalid integer \"01x0\"")), "{:?}", messages);
        }
        other => panic!("unexpected error {}", other),
    }
    assert!(err.to_string().starts_with("loading FOOD_DES.txt: read_file("));
}

#[tokio::test]
async fn nutrient_rows_must_reference_known_foods() {
    let tmp = fixture_db();
    write_table(tmp.path(), "NUT_DATA.txt", &[nut_data("99999", "203", "1.0", "1")]);
    let err = load(tmp.path(), 64).await.unwrap_err();
    assert!(err.to_string().contains("could not find food 99999"), "{}", err);
}

#[tokio::test]
async fn missing_table_reports_the_file() {
    let tmp = fixture_db();
    fs::remove_file(tmp.path().join("WEIGHT.txt")).unwrap();
    match load(tmp.path(), 64).await.unwrap_err() {
        LoadError::Table { table: Table::Weights, source: IngestError::Open { path, .. } } => {
            assert_eq!(path, tmp.path().join("WEIGHT.txt"));
        }
        other => panic!("unexpected error {}", other),
    }
}
