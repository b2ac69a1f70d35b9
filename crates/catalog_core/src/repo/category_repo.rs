//! Category search rules and repositories.
//!
//! # Responsibility
//! - Define how categories are filtered and sorted.
//! - Provide the in-memory and SQLite-backed category stores.
//!
//! # Invariants
//! - The name filter is a case-insensitive substring match.
//! - Sort keys use the transport field names (`name`, `createdAt`).
//! - Without a sortable field, results are ordered by creation time desc.
//! - Both stores return identical pages and metadata for the same data.
//! - SQLite ties are broken by insertion sequence, mirroring a stable sort.

use crate::model::category::{Category, CategoryProps};
use crate::model::entity::Entity;
use crate::model::id::EntityId;
use crate::repo::in_memory::InMemoryRepository;
use crate::repo::{NotFoundError, RepoError, RepoResult, Repository, SearchableRepository};
use crate::search::params::{SearchParams, SortDirection};
use crate::search::pipeline::{sort_by_key_with, SearchSpec, SortKey};
use crate::search::result::SearchResult;
use log::{debug, warn};
use rusqlite::types::Value;
use rusqlite::{
    params, params_from_iter, Connection, OptionalExtension, Row, Transaction,
    TransactionBehavior,
};
use std::borrow::Cow;

/// Fields accepted by category searches as sort keys.
pub const CATEGORY_SORTABLE_FIELDS: &[&str] = &["name", "createdAt"];

const CATEGORY_SELECT_SQL: &str = "SELECT
    id,
    name,
    description,
    is_active,
    created_at
FROM categories";

/// Any searchable store of categories filtered by name.
pub trait CategoryRepository: SearchableRepository<Category, Filter = String> {}

impl<T> CategoryRepository for T where T: SearchableRepository<Category, Filter = String> {}

/// Category filter and sort rules for in-memory searches.
#[derive(Debug, Clone, Copy, Default)]
pub struct CategorySearch;

impl SearchSpec<Category> for CategorySearch {
    type Filter = String;

    fn sortable_fields(&self) -> &[&'static str] {
        CATEGORY_SORTABLE_FIELDS
    }

    fn matches(&self, item: &Category, filter: &String) -> bool {
        fold(item.name()).contains(&fold(filter))
    }

    fn sort_key(&self, field: &str, item: &Category) -> Option<SortKey> {
        match field {
            "name" => Some(item.name().into()),
            "createdAt" => Some(item.created_at().into()),
            _ => None,
        }
    }

    fn default_order<'a>(&self, items: Cow<'a, [Category]>) -> Cow<'a, [Category]> {
        sort_by_key_with(items, Some(SortDirection::Desc), Category::created_at)
    }
}

/// In-memory category store.
pub type CategoryInMemoryRepository = InMemoryRepository<Category, CategorySearch>;

/// SQLite-backed category repository.
pub struct SqliteCategoryRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteCategoryRepository<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }

    fn insert_row(conn: &Connection, category: &Category) -> RepoResult<()> {
        conn.execute(
            "INSERT INTO categories (
                id,
                name,
                name_folded,
                description,
                is_active,
                created_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6);",
            params![
                category.id().as_str(),
                category.name(),
                fold(category.name()),
                category.description(),
                bool_to_int(category.is_active()),
                category.created_at(),
            ],
        )?;
        Ok(())
    }

    fn count(&self, where_sql: &str, binds: &[Value]) -> RepoResult<u64> {
        let total: i64 = self.conn.query_row(
            &format!("SELECT COUNT(*) FROM categories{where_sql};"),
            params_from_iter(binds.iter()),
            |row| row.get(0),
        )?;
        u64::try_from(total)
            .map_err(|_| RepoError::InvalidData(format!("negative row count `{total}`")))
    }
}

impl Repository<Category> for SqliteCategoryRepository<'_> {
    fn insert(&mut self, entity: Category) -> RepoResult<()> {
        entity.ensure_valid()?;
        Self::insert_row(self.conn, &entity)?;
        debug!("event=repo_insert module=repo status=ok store=sqlite entity=Category count=1");
        Ok(())
    }

    fn bulk_insert(&mut self, entities: Vec<Category>) -> RepoResult<()> {
        for entity in &entities {
            entity.ensure_valid()?;
        }

        let tx = Transaction::new_unchecked(self.conn, TransactionBehavior::Immediate)?;
        for entity in &entities {
            Self::insert_row(&tx, entity)?;
        }
        tx.commit()?;

        debug!(
            "event=repo_bulk_insert module=repo status=ok store=sqlite entity=Category count={}",
            entities.len()
        );
        Ok(())
    }

    fn update(&mut self, entity: Category) -> RepoResult<()> {
        entity.ensure_valid()?;

        let changed = self.conn.execute(
            "UPDATE categories
             SET
                name = ?1,
                name_folded = ?2,
                description = ?3,
                is_active = ?4
             WHERE id = ?5;",
            params![
                entity.name(),
                fold(entity.name()),
                entity.description(),
                bool_to_int(entity.is_active()),
                entity.id().as_str(),
            ],
        )?;

        if changed == 0 {
            warn!("event=repo_update module=repo status=not_found store=sqlite entity=Category");
            return Err(NotFoundError::of::<Category>(entity.entity_id()).into());
        }

        debug!("event=repo_update module=repo status=ok store=sqlite entity=Category");
        Ok(())
    }

    fn delete(&mut self, id: &EntityId) -> RepoResult<()> {
        let changed = self
            .conn
            .execute("DELETE FROM categories WHERE id = ?1;", [id.as_str()])?;

        if changed == 0 {
            warn!("event=repo_delete module=repo status=not_found store=sqlite entity=Category");
            return Err(NotFoundError::of::<Category>(id).into());
        }

        debug!("event=repo_delete module=repo status=ok store=sqlite entity=Category");
        Ok(())
    }

    fn find_by_id(&self, id: &EntityId) -> RepoResult<Option<Category>> {
        let row = self
            .conn
            .query_row(
                &format!("{CATEGORY_SELECT_SQL} WHERE id = ?1;"),
                [id.as_str()],
                |row| Ok(parse_category_row(row)),
            )
            .optional()?;

        row.transpose()
    }

    fn find_all(&self) -> RepoResult<Vec<Category>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{CATEGORY_SELECT_SQL} ORDER BY seq ASC;"))?;
        let mut rows = stmt.query([])?;
        let mut categories = Vec::new();

        while let Some(row) = rows.next()? {
            categories.push(parse_category_row(row)?);
        }

        Ok(categories)
    }
}

impl SearchableRepository<Category> for SqliteCategoryRepository<'_> {
    type Filter = String;

    fn sortable_fields(&self) -> &[&'static str] {
        CATEGORY_SORTABLE_FIELDS
    }

    fn search(&self, params: &SearchParams<String>) -> RepoResult<SearchResult<Category>> {
        let mut where_sql = String::new();
        let mut binds: Vec<Value> = Vec::new();

        if let Some(filter) = params.filter() {
            where_sql.push_str(" WHERE instr(name_folded, ?) > 0");
            binds.push(Value::Text(fold(filter)));
        }

        let total = self.count(&where_sql, &binds)?;

        let mut sql = format!("{CATEGORY_SELECT_SQL}{where_sql}");
        sql.push_str(&order_by_sql(params.sort(), params.sort_dir()));
        sql.push_str(" LIMIT ? OFFSET ?;");
        binds.push(Value::Integer(to_sql_integer(params.per_page())));
        binds.push(Value::Integer(to_sql_integer(params.offset())));

        let mut stmt = self.conn.prepare(&sql)?;
        let mut rows = stmt.query(params_from_iter(binds))?;
        let mut items = Vec::new();

        while let Some(row) = rows.next()? {
            items.push(parse_category_row(row)?);
        }

        let result = SearchResult::new(items, total, params.page(), params.per_page());
        debug!(
            "event=repo_search module=repo status=ok store=sqlite entity=Category total={} page={} per_page={}",
            result.total(),
            result.current_page(),
            result.per_page()
        );
        Ok(result)
    }
}

/// Case folding shared by the in-memory filter and the stored folded name.
fn fold(value: &str) -> String {
    value.to_lowercase()
}

fn order_by_sql(sort: Option<&str>, sort_dir: Option<SortDirection>) -> String {
    let direction = match sort_dir {
        Some(SortDirection::Asc) => "ASC",
        _ => "DESC",
    };
    match sort {
        Some("name") => format!(" ORDER BY name {direction}, seq ASC"),
        Some("createdAt") => format!(" ORDER BY created_at {direction}, seq ASC"),
        _ => " ORDER BY created_at DESC, seq ASC".to_string(),
    }
}

fn parse_category_row(row: &Row<'_>) -> RepoResult<Category> {
    let id_text: String = row.get("id")?;
    let id = EntityId::parse(&id_text).map_err(|_| {
        RepoError::InvalidData(format!("invalid id value `{id_text}` in categories.id"))
    })?;

    let active = match row.get::<_, i64>("is_active")? {
        0 => false,
        1 => true,
        other => {
            return Err(RepoError::InvalidData(format!(
                "invalid is_active value `{other}` in categories.is_active"
            )));
        }
    };

    let category = Category::new(CategoryProps {
        id: Some(id),
        name: row.get("name")?,
        description: row.get("description")?,
        active: Some(active),
        created_at: Some(row.get("created_at")?),
    });
    category.ensure_valid()?;
    Ok(category)
}

fn to_sql_integer(value: u64) -> i64 {
    i64::try_from(value).unwrap_or(i64::MAX)
}

fn bool_to_int(value: bool) -> i64 {
    if value {
        1
    } else {
        0
    }
}
