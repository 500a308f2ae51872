//! Sort applier and pagination against a real (in-memory) SQLite database.

use anyhow::Result;
use paging_core::{PageRequest, PropertyMapping, PropertyMappingValue};
use routine_db::paging::{contains, contains_any};
use routine_db::{paginate, ConnectOpts, DbHandle, FieldMap, PageError, SortApplyExt};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter, QueryOrder, Schema,
    Set,
};

mod gadget {
    use sea_orm::entity::prelude::*;

    #[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
    #[sea_orm(table_name = "gadgets")]
    pub struct Model {
        #[sea_orm(primary_key, auto_increment = false)]
        pub id: i32,
        pub name: String,
        pub category: String,
        pub rank: i32,
    }

    #[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
    pub enum Relation {}

    impl ActiveModelBehavior for ActiveModel {}
}

use gadget::{Column, Entity as Gadget};

fn field_map() -> FieldMap<Gadget> {
    FieldMap::new()
        .insert("Id", Column::Id)
        .insert("Name", Column::Name)
        .insert("Category", Column::Category)
        .insert("Rank", Column::Rank)
}

fn mapping() -> PropertyMapping {
    PropertyMapping::new()
        .insert("id", PropertyMappingValue::new(["Id"]))
        .insert("label", PropertyMappingValue::new(["Name"]))
        .insert("kind", PropertyMappingValue::new(["Category"]))
        .insert("score", PropertyMappingValue::new(["Rank"]).reverted())
        .insert("ghost", PropertyMappingValue::new(["Weight"]))
}

async fn setup(rows: &[(i32, &str, &str, i32)]) -> Result<DbHandle> {
    let db = DbHandle::connect("sqlite::memory:", ConnectOpts::default()).await?;
    let conn = db.seaorm();
    let backend = conn.get_database_backend();
    let schema = Schema::new(backend);
    conn.execute(backend.build(&schema.create_table_from_entity(Gadget)))
        .await?;

    for (id, name, category, rank) in rows {
        gadget::ActiveModel {
            id: Set(*id),
            name: Set((*name).to_string()),
            category: Set((*category).to_string()),
            rank: Set(*rank),
        }
        .insert(conn)
        .await?;
    }
    Ok(db)
}

async fn setup_numbered(n: i32) -> Result<DbHandle> {
    let names: Vec<String> = (1..=n).map(|i| format!("gadget-{i:02}")).collect();
    let rows: Vec<(i32, &str, &str, i32)> = names
        .iter()
        .enumerate()
        .map(|(i, name)| {
            let id = i as i32 + 1;
            let category = if id % 2 == 0 { "tools" } else { "toys" };
            (id, name.as_str(), category, id % 5)
        })
        .collect();
    setup(&rows).await
}

fn ids(models: &[gadget::Model]) -> Vec<i32> {
    models.iter().map(|m| m.id).collect()
}

#[tokio::test]
async fn count_reflects_filter_not_whole_table() -> Result<()> {
    let db = setup_numbered(10).await?;
    let conn = db.seaorm();

    // 5 matching, 5 not matching; one page large enough for everything
    let select = Gadget::find().filter(Column::Category.eq("tools"));
    let page = paginate(select, conn, PageRequest::new(1, 10), |m| m).await?;

    assert_eq!(page.total_count(), 5);
    assert_eq!(page.total_pages(), 1);
    assert_eq!(page.len(), 5);
    assert!(page.items().iter().all(|m| m.category == "tools"));
    Ok(())
}

#[tokio::test]
async fn windows_cover_result_set_and_run_past_the_end() -> Result<()> {
    let db = setup_numbered(25).await?;
    let conn = db.seaorm();

    let mut seen = Vec::new();
    for (page_number, expected_len) in [(1, 10), (2, 10), (3, 5), (4, 0)] {
        let select = Gadget::find().order_by_asc(Column::Id);
        let page = paginate(select, conn, PageRequest::new(page_number, 10), |m| m.id).await?;
        assert_eq!(page.len(), expected_len, "page {page_number}");
        assert_eq!(page.total_count(), 25);
        assert_eq!(page.total_pages(), 3);
        assert_eq!(page.current_page(), page_number);
        seen.extend(page.into_items());
    }
    assert_eq!(seen, (1..=25).collect::<Vec<_>>());
    Ok(())
}

#[tokio::test]
async fn empty_table_has_zero_pages() -> Result<()> {
    let db = setup(&[]).await?;
    let page = paginate(Gadget::find(), db.seaorm(), PageRequest::new(1, 5), |m| m).await?;
    assert_eq!(page.total_count(), 0);
    assert_eq!(page.total_pages(), 0);
    assert!(page.is_empty());
    Ok(())
}

#[tokio::test]
async fn reverted_key_sorts_descending() -> Result<()> {
    let db = setup(&[(1, "a", "x", 3), (2, "b", "x", 9), (3, "c", "x", 1)]).await?;
    let rows = Gadget::find()
        .apply_sort("score", &mapping(), &field_map())?
        .all(db.seaorm())
        .await?;
    assert_eq!(ids(&rows), vec![2, 1, 3]);

    let rows = Gadget::find()
        .apply_sort("score desc", &mapping(), &field_map())?
        .all(db.seaorm())
        .await?;
    assert_eq!(ids(&rows), vec![3, 1, 2]);
    Ok(())
}

#[tokio::test]
async fn clauses_chain_into_tie_breakers() -> Result<()> {
    let db = setup(&[
        (1, "b", "tools", 0),
        (2, "a", "toys", 0),
        (3, "c", "tools", 0),
        (4, "a", "tools", 0),
    ])
    .await?;
    let rows = Gadget::find()
        .apply_sort("kind, label desc", &mapping(), &field_map())?
        .all(db.seaorm())
        .await?;
    assert_eq!(ids(&rows), vec![3, 1, 4, 2]);
    Ok(())
}

#[tokio::test]
async fn key_and_direction_case_do_not_matter() -> Result<()> {
    let db = setup(&[(1, "m", "x", 0), (2, "z", "x", 0), (3, "a", "x", 0)]).await?;
    let mut results = Vec::new();
    for raw in ["LABEL desc", "label DESC", "label desc"] {
        let rows = Gadget::find()
            .apply_sort(raw, &mapping(), &field_map())?
            .all(db.seaorm())
            .await?;
        results.push(ids(&rows));
    }
    assert_eq!(results[0], vec![2, 1, 3]);
    assert!(results.iter().all(|r| r == &results[0]));
    Ok(())
}

#[tokio::test]
async fn unknown_key_leaves_select_untouched() -> Result<()> {
    let db = setup_numbered(6).await?;
    let plain = Gadget::find()
        .apply_sort("", &mapping(), &field_map())?
        .all(db.seaorm())
        .await?;
    let bogus = Gadget::find()
        .apply_sort("bogusfield desc", &mapping(), &field_map())?
        .all(db.seaorm())
        .await?;
    assert_eq!(ids(&plain), ids(&bogus));
    Ok(())
}

#[test]
fn table_field_without_column_is_a_configuration_error() {
    let err = Gadget::find()
        .apply_sort("label, ghost", &mapping(), &field_map())
        .err();
    assert_eq!(err, Some(PageError::UnmappedField("Weight".into())));
    assert_eq!(field_map().missing_from(&mapping()), vec!["Weight".to_string()]);
}

#[tokio::test]
async fn contains_matches_wildcards_literally() -> Result<()> {
    let db = setup(&[
        (1, "50% off", "promo", 0),
        (2, "500 units", "bulk", 0),
        (3, "snake_case", "promo", 0),
        (4, "snakeXcase", "promo", 0),
    ])
    .await?;
    let conn = db.seaorm();

    let rows = Gadget::find()
        .filter(contains(Column::Name, "50%"))
        .all(conn)
        .await?;
    assert_eq!(ids(&rows), vec![1]);

    let rows = Gadget::find()
        .filter(contains(Column::Name, "e_c"))
        .all(conn)
        .await?;
    assert_eq!(ids(&rows), vec![3]);

    let rows = Gadget::find()
        .filter(contains_any(&[Column::Name, Column::Category], "bulk"))
        .order_by_asc(Column::Id)
        .all(conn)
        .await?;
    assert_eq!(ids(&rows), vec![2]);
    Ok(())
}
