use anyhow::Result;
use rand::Rng;
use rowscan::column::{any, bincode, null, payload, Bincode, ColumnList, Json, PayloadCodec};
use rowscan::common::DataValue;
use rowscan::cursor::{ResultSet, Rows};
use rowscan::executor::{all, one};

#[path = "../common/mod.rs"]
mod common;
use common::{author, post_columns, Author, FakeRows, Post};

#[test]
fn test_name_keyed_binding_ignores_column_order_and_extras() -> Result<()> {
    // Wider projection with the columns in a different order
    let rows = ResultSet::from_rows(
        ["created_at", "authors", "id", "title", "views"],
        vec![vec![
            DataValue::Timestamp("2024-01-01 00:00:00".to_string()),
            DataValue::Text(r#"[{"id": 7, "name": "Kim"}]"#.to_string()),
            DataValue::Integer(7),
            DataValue::Text("Wide".to_string()),
            DataValue::Integer(1000),
        ]],
    )?;

    let post: Post = one(rows, &post_columns())?;
    assert_eq!(post, Post { id: 7, title: "Wide".to_string(), authors: vec![author(7, "Kim")] });
    Ok(())
}

#[test]
fn test_unmatched_mapping_entries_are_never_invoked() -> Result<()> {
    let columns = post_columns().column("missing", any(|_: &mut Post, _: i64| panic!("never bound")));
    let rows = ResultSet::from_rows(["id"], vec![vec![DataValue::Integer(3)]])?;

    let post: Post = one(rows, &columns)?;
    assert_eq!(post.id, 3);
    assert_eq!(post.title, "");
    Ok(())
}

#[test]
fn test_plan_is_resolved_per_cursor() -> Result<()> {
    let columns = post_columns();

    let narrow = ResultSet::from_rows(["title"], vec![vec![DataValue::Null]])?;
    let wide = ResultSet::from_rows(["id", "title"], vec![vec![DataValue::Integer(9), DataValue::Text("T".into())]])?;

    let a: Post = one(narrow, &columns)?;
    let b: Post = one(wide, &columns)?;
    assert_eq!((a.id, a.title.as_str()), (0, "No Title"));
    assert_eq!((b.id, b.title.as_str()), (9, "T"));
    Ok(())
}

#[test]
fn test_later_column_wins() -> Result<()> {
    let mut rng = rand::thread_rng();
    let columns = ColumnList::<i64>::new()
        .column(any(|t: &mut i64, v: i64| *t = v))
        .column(any(|t: &mut i64, v: i64| *t = v * 10));

    for _ in 0..20 {
        let (x, y): (i64, i64) = (rng.gen_range(-1000..1000), rng.gen_range(-1000..1000));
        let rows = ResultSet::from_rows(["x", "y"], vec![vec![x.into(), y.into()]])?;
        assert_eq!(one(rows, &columns)?, y * 10);
    }
    Ok(())
}

#[test]
fn test_later_column_reads_earlier_state() -> Result<()> {
    let columns = ColumnList::<Post>::new()
        .column(any(|p: &mut Post, id: i64| p.id = id))
        .column(any(|p: &mut Post, title: String| p.title = format!("#{} {}", p.id, title)));
    let rows = ResultSet::from_rows(["id", "title"], vec![vec![DataValue::Integer(4), "Four".into()]])?;

    let post: Post = one(rows, &columns)?;
    assert_eq!(post.title, "#4 Four");
    Ok(())
}

#[test]
fn test_null_default_only_for_null() -> Result<()> {
    let mut rng = rand::thread_rng();
    let columns = ColumnList::<i64>::new().column(null(-1, |t: &mut i64, v: i64| *t = v));

    let values: Vec<Option<i64>> = (0..50)
        .map(|_| if rng.gen_bool(0.3) { None } else { Some(rng.gen_range(0..100)) })
        .collect();
    let rows = ResultSet::from_rows(["v"], values.iter().map(|v| vec![(*v).into()]).collect())?;

    let got: Vec<i64> = all(rows, &columns)?;
    let want: Vec<i64> = values.iter().map(|v| v.unwrap_or(-1)).collect();
    assert_eq!(got, want);
    Ok(())
}

#[test]
fn test_payload_round_trip_through_cursor() -> Result<()> {
    let mut rng = rand::thread_rng();
    let authors: Vec<Vec<Author>> = (0..10)
        .map(|i| (0..rng.gen_range(0..4)).map(|j| author(j, &format!("author {} {}", i, j))).collect())
        .collect();

    let bin = ColumnList::<Post>::new().column(bincode(|p: &mut Post, a: Vec<Author>| p.authors = a));
    let rows = ResultSet::from_rows(
        ["authors"],
        authors.iter().map(|a| Bincode::encode(a).map(|b| vec![DataValue::Blob(b)])).collect::<Result<Vec<_>, _>>().map_err(anyhow::Error::msg)?,
    )?;
    let got: Vec<Post> = all(rows, &bin)?;
    assert_eq!(got.into_iter().map(|p| p.authors).collect::<Vec<_>>(), authors);

    let text = ColumnList::<Post>::new().column(payload::<Json, _, _, _>(|p: &mut Post, a: Vec<Author>| p.authors = a));
    let rows = ResultSet::from_rows(
        ["authors"],
        authors.iter().map(|a| Json::encode(a).map(|b| vec![DataValue::Blob(b)])).collect::<Result<Vec<_>, _>>().map_err(anyhow::Error::msg)?,
    )?;
    let got: Vec<Post> = all(rows, &text)?;
    assert_eq!(got.into_iter().map(|p| p.authors).collect::<Vec<_>>(), authors);
    Ok(())
}

#[test]
fn test_boxed_cursor() -> Result<()> {
    let rows: Box<dyn Rows> = Box::new(FakeRows::new(common::rows1()));
    let posts: Vec<Post> = all(rows, &post_columns())?;
    assert_eq!(posts.len(), 2);
    Ok(())
}

#[test]
fn test_borrowed_cursor_is_closed() -> Result<()> {
    let mut rows = common::row3();
    let post: Post = one(&mut rows, &post_columns())?;
    assert_eq!(post.id, 1);
    assert!(rows.is_closed());
    Ok(())
}

#[test]
fn test_array_column_set() -> Result<()> {
    let columns = [any(|t: &mut (i64, i64), v: i64| t.0 = v), any(|t: &mut (i64, i64), v: i64| t.1 = v)];
    let rows = ResultSet::from_rows(["a", "b"], vec![vec![1i64.into(), 2i64.into()], vec![3i64.into(), 4i64.into()]])?;

    assert_eq!(all(rows, &columns)?, vec![(1, 2), (3, 4)]);
    Ok(())
}
