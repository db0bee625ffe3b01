use mongodb::{
    bson::doc,
    options::IndexOptions,
    Database, IndexModel,
};

pub async fn ensure_indexes(db: &Database) -> Result<(), String> {
    // users: unique username
    let col = db.collection::<mongodb::bson::Document>("users");
    let model = IndexModel::builder()
        .keys(doc! { "username": 1 })
        .options(IndexOptions::builder().unique(true).build())
        .build();

    col.create_index(model, None)
        .await
        .map_err(|e| e.to_string())?;

    Ok(())
}
