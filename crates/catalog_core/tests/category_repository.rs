use catalog_core::db::open_db_in_memory;
use catalog_core::testing::CategoryFakeBuilder;
use catalog_core::{
    Category, CategoryInMemoryRepository, CategoryProps, EntityId, RepoError, Repository,
    SearchParams, SearchResult, SearchableRepository, SqliteCategoryRepository,
};
use rusqlite::Connection;
use serde_json::json;

const NAMES: [&str; 11] = [
    "Ziraldo",
    "Sebastião",
    "Marina",
    "Sabrina",
    "Jorel",
    "Armando",
    "Joana",
    "Elisa",
    "Clara",
    "Marcondes",
    "Clarice",
];

fn categories() -> Vec<Category> {
    CategoryFakeBuilder::the_categories(NAMES.len())
        .with_seed(11)
        .with_name_factory(|index| NAMES[index].to_string())
        .with_created_at_factory(|index| 1_700_000_000_000 + index as i64 * 1_000)
        .build()
}

fn both_stores<'conn>(
    conn: &'conn Connection,
    items: &[Category],
) -> (CategoryInMemoryRepository, SqliteCategoryRepository<'conn>) {
    let mut memory = CategoryInMemoryRepository::default();
    memory.bulk_insert(items.to_vec()).unwrap();
    let mut sqlite = SqliteCategoryRepository::new(conn);
    sqlite.bulk_insert(items.to_vec()).unwrap();
    (memory, sqlite)
}

fn search<R: SearchableRepository<Category, Filter = String>>(
    repo: &R,
    input: serde_json::Value,
) -> SearchResult<Category> {
    repo.search(&SearchParams::from_json(&input)).unwrap()
}

fn names_of(result: &SearchResult<Category>) -> Vec<&str> {
    result.items().iter().map(Category::name).collect()
}

#[test]
fn default_order_is_newest_first() {
    let conn = open_db_in_memory().unwrap();
    let items = categories();
    let (memory, sqlite) = both_stores(&conn, &items);

    for result in [search(&memory, json!({})), search(&sqlite, json!({}))] {
        assert_eq!(result.total(), 11);
        assert_eq!(result.per_page(), 15);
        assert_eq!(result.last_page(), 1);
        assert_eq!(result.items()[0], items[10]);
        assert_eq!(result.items()[10], items[0]);
    }
}

#[test]
fn name_filter_is_case_insensitive_in_both_stores() {
    let conn = open_db_in_memory().unwrap();
    let items = categories();
    let (memory, sqlite) = both_stores(&conn, &items);

    let input = json!({ "filter": "SEBASTIÃ" });
    assert_eq!(names_of(&search(&memory, input.clone())), ["Sebastião"]);
    assert_eq!(names_of(&search(&sqlite, input)), ["Sebastião"]);

    let input = json!({ "filter": "%" });
    assert_eq!(search(&memory, input.clone()).total(), 0);
    assert_eq!(search(&sqlite, input).total(), 0);
}

#[test]
fn stores_agree_on_every_page() {
    let conn = open_db_in_memory().unwrap();
    let items = categories();
    let (memory, sqlite) = both_stores(&conn, &items);

    let cases = [
        json!({ "perPage": 5 }),
        json!({ "page": 3, "perPage": 2, "filter": "l" }),
        json!({ "page": 1, "perPage": 2, "sort": "name" }),
        json!({ "page": 2, "perPage": 2, "sort": "name", "sortDir": "desc" }),
        json!({ "page": 1, "perPage": 3, "sort": "createdAt", "sortDir": "asc" }),
        json!({ "page": 1, "perPage": 3, "sort": "description", "sortDir": "asc" }),
        json!({ "page": 2, "perPage": 4, "sort": "name", "filter": "a" }),
        json!({ "page": 9, "perPage": 4 }),
        json!({ "page": "2", "perPage": "4.0", "sort": "name", "sortDir": "DESC" }),
    ];

    for input in cases {
        assert_eq!(
            search(&memory, input.clone()),
            search(&sqlite, input.clone()),
            "stores disagree for {input}"
        );
    }
}

#[test]
fn created_at_sort_uses_transport_field_name_in_both_stores() {
    let conn = open_db_in_memory().unwrap();
    let items = CategoryFakeBuilder::the_categories(3)
        .with_name_factory(|index| format!("c{index}"))
        .with_created_at_factory(|index| 1_000 + index as i64)
        .build();
    let (memory, sqlite) = both_stores(&conn, &items);

    let asc = json!({ "sort": "createdAt", "sortDir": "asc" });
    assert_eq!(names_of(&search(&memory, asc.clone())), ["c0", "c1", "c2"]);
    assert_eq!(names_of(&search(&sqlite, asc.clone())), ["c0", "c1", "c2"]);
    assert_eq!(search(&memory, asc.clone()), search(&sqlite, asc));

    // column name is not a sort key; default order applies
    let snake = json!({ "sort": "created_at", "sortDir": "asc" });
    assert_eq!(names_of(&search(&memory, snake.clone())), ["c2", "c1", "c0"]);
    assert_eq!(names_of(&search(&sqlite, snake)), ["c2", "c1", "c0"]);
    assert_eq!(memory.sortable_fields(), ["name", "createdAt"]);
}

#[test]
fn equal_timestamps_keep_insertion_order_in_both_stores() {
    let conn = open_db_in_memory().unwrap();
    let items = CategoryFakeBuilder::the_categories(4)
        .with_name_factory(|index| format!("Tied {index}"))
        .with_created_at(42)
        .build();
    let (memory, sqlite) = both_stores(&conn, &items);

    let expected = ["Tied 0", "Tied 1", "Tied 2", "Tied 3"];
    assert_eq!(names_of(&search(&memory, json!({}))), expected);
    assert_eq!(names_of(&search(&sqlite, json!({}))), expected);
}

#[test]
fn sqlite_roundtrip_preserves_fields() {
    let conn = open_db_in_memory().unwrap();
    let mut repo = SqliteCategoryRepository::new(&conn);
    let category = Category::new(CategoryProps {
        id: Some(EntityId::parse("5D2D9277-D765-43CD-9D2E-A589BE6277B5").unwrap()),
        name: "Documentary".to_string(),
        description: Some("Non-fiction".to_string()),
        active: Some(false),
        created_at: Some(1_234),
    });

    repo.insert(category.clone()).unwrap();

    let loaded = repo.get_by_id(category.id()).unwrap();
    assert_eq!(loaded, category);
    assert_eq!(loaded.id().as_str(), "5d2d9277-d765-43cd-9d2e-a589be6277b5");
    assert_eq!(repo.find_all().unwrap(), vec![category]);
}

#[test]
fn sqlite_update_and_delete() {
    let conn = open_db_in_memory().unwrap();
    let mut repo = SqliteCategoryRepository::new(&conn);
    let mut category = CategoryFakeBuilder::a_category().with_name("Movie").build_one();
    repo.insert(category.clone()).unwrap();

    category.update("Film", None);
    category.deactivate();
    repo.update(category.clone()).unwrap();
    assert_eq!(repo.get_by_id(category.id()).unwrap(), category);
    assert_eq!(
        names_of(&search(&repo, json!({ "filter": "fil" }))),
        ["Film"]
    );

    repo.delete(category.id()).unwrap();
    assert_eq!(repo.find_by_id(category.id()).unwrap(), None);
}

#[test]
fn sqlite_unknown_ids_fail_with_not_found() {
    let conn = open_db_in_memory().unwrap();
    let mut repo = SqliteCategoryRepository::new(&conn);
    let stranger = CategoryFakeBuilder::a_category().build_one();

    let err = repo.update(stranger.clone()).unwrap_err();
    assert_eq!(
        err.to_string(),
        format!("Category not found for id {}", stranger.id())
    );
    assert!(matches!(
        repo.delete(stranger.id()).unwrap_err(),
        RepoError::NotFound(_)
    ));
    assert!(matches!(
        repo.get_by_id(stranger.id()).unwrap_err(),
        RepoError::NotFound(_)
    ));
}

#[test]
fn sqlite_rejects_invalid_categories_atomically() {
    let conn = open_db_in_memory().unwrap();
    let mut repo = SqliteCategoryRepository::new(&conn);

    let too_long = CategoryFakeBuilder::a_category()
        .with_invalid_name_too_long()
        .build_one();
    assert!(matches!(
        repo.insert(too_long.clone()).unwrap_err(),
        RepoError::Validation(_)
    ));

    let valid = CategoryFakeBuilder::a_category().build_one();
    let err = repo.bulk_insert(vec![valid, too_long]).unwrap_err();
    assert!(matches!(err, RepoError::Validation(_)));
    assert!(repo.find_all().unwrap().is_empty());
}

#[test]
fn sqlite_bulk_insert_rolls_back_on_storage_error() {
    let conn = open_db_in_memory().unwrap();
    let mut repo = SqliteCategoryRepository::new(&conn);
    let first = CategoryFakeBuilder::a_category().build_one();

    let err = repo
        .bulk_insert(vec![first.clone(), first.clone()])
        .unwrap_err();
    assert!(matches!(err, RepoError::Db(_)));
    assert!(repo.find_all().unwrap().is_empty());

    repo.insert(first.clone()).unwrap();
    assert_eq!(repo.find_all().unwrap(), vec![first]);
}

#[test]
fn sqlite_corrupt_rows_are_invalid_data() {
    let conn = open_db_in_memory().unwrap();
    conn.execute(
        "INSERT INTO categories (id, name, name_folded, is_active, created_at)
         VALUES ('not-a-uuid', 'Movie', 'movie', 1, 1);",
        [],
    )
    .unwrap();
    let repo = SqliteCategoryRepository::new(&conn);

    assert!(matches!(
        repo.find_all().unwrap_err(),
        RepoError::InvalidData(_)
    ));
}

#[test]
fn sqlite_rows_failing_validation_are_rejected_on_read() {
    let conn = open_db_in_memory().unwrap();
    conn.execute(
        "INSERT INTO categories (id, name, name_folded, is_active, created_at)
         VALUES ('9366b7dc-2d71-4799-b91c-c64adb205104', '', '', 1, 1);",
        [],
    )
    .unwrap();
    let repo = SqliteCategoryRepository::new(&conn);

    assert!(matches!(
        repo.search(&SearchParams::default()).unwrap_err(),
        RepoError::Validation(_)
    ));
}
