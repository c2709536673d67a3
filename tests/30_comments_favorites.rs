mod common;

use anyhow::Result;
use axum::http::{Method, StatusCode};
use serde_json::json;

use common::spawn_app;

#[tokio::test]
async fn favoriting_twice_keeps_the_count() -> Result<()> {
    let app = spawn_app().await?;
    let anna = app.register("chef_anna").await?;
    let ben = app.register("chef_ben").await?;
    let id = app.create_recipe(anna, "Soup", &[]).await?;
    let fav = format!("/api/recipes/{id}/favorite");

    let first = app.json(Method::POST, &fav, json!({"userId": ben})).await?;
    assert_eq!(first.status, StatusCode::OK);
    assert_eq!(first.message(), "Recipe favorited");

    let count = app.get(&format!("/api/recipes/{id}/favorites")).await?;
    assert_eq!(count.body["count"], 1);

    // userId as a string is accepted too
    let second = app
        .json(Method::POST, &fav, json!({"userId": ben.to_string()}))
        .await?;
    assert_eq!(second.status, StatusCode::OK);

    let count = app.get(&format!("/api/recipes/{id}/favorites")).await?;
    assert_eq!(count.body["count"], 1);

    app.json(Method::POST, &fav, json!({"userId": anna})).await?;
    let count = app.get(&format!("/api/recipes/{id}/favorites")).await?;
    assert_eq!(count.body["count"], 2);

    // likes on the recipe track favorites
    let recipe = app.get(&format!("/api/recipes/{id}")).await?;
    assert_eq!(recipe.body["likes"], 2);
    Ok(())
}

#[tokio::test]
async fn favorite_validation() -> Result<()> {
    let app = spawn_app().await?;
    let anna = app.register("chef_anna").await?;
    let id = app.create_recipe(anna, "Soup", &[]).await?;

    let no_user = app
        .json(Method::POST, &format!("/api/recipes/{id}/favorite"), json!({}))
        .await?;
    assert_eq!(no_user.status, StatusCode::BAD_REQUEST);
    assert_eq!(no_user.error(), "userId required");

    let missing = app
        .json(Method::POST, "/api/recipes/999/favorite", json!({"userId": anna}))
        .await?;
    assert_eq!(missing.status, StatusCode::NOT_FOUND);

    let none = app.get("/api/recipes/999/favorites").await?;
    assert_eq!(none.status, StatusCode::OK);
    assert_eq!(none.body["count"], 0);
    Ok(())
}

#[tokio::test]
async fn comments_are_listed_newest_first_with_usernames() -> Result<()> {
    let app = spawn_app().await?;
    let anna = app.register("chef_anna").await?;
    let ben = app.register("chef_ben").await?;
    let id = app.create_recipe(anna, "Soup", &[]).await?;
    let uri = format!("/api/recipes/{id}/comments");

    let first = app
        .json(Method::POST, &uri, json!({"userId": ben, "content": "  looks great "}))
        .await?;
    assert_eq!(first.status, StatusCode::OK);
    assert_eq!(first.message(), "Comment added");
    assert!(first.body["id"].as_i64().is_some());

    app.json(Method::POST, &uri, json!({"userId": anna, "content": "thanks"}))
        .await?;

    let list = app.get(&uri).await?;
    assert_eq!(list.status, StatusCode::OK);
    let items = list.body.as_array().cloned().unwrap_or_default();
    assert_eq!(items.len(), 2);
    assert_eq!(items[0]["content"], "thanks");
    assert_eq!(items[0]["username"], "chef_anna");
    assert_eq!(items[1]["content"], "looks great");
    assert_eq!(items[1]["username"], "chef_ben");
    assert_eq!(items[1]["user_id"], ben);
    Ok(())
}

#[tokio::test]
async fn comment_creation_requires_content_user_and_recipe() -> Result<()> {
    let app = spawn_app().await?;
    let anna = app.register("chef_anna").await?;
    let id = app.create_recipe(anna, "Soup", &[]).await?;
    let uri = format!("/api/recipes/{id}/comments");

    let blank = app
        .json(Method::POST, &uri, json!({"userId": anna, "content": "   "}))
        .await?;
    assert_eq!(blank.status, StatusCode::BAD_REQUEST);

    let anonymous = app.json(Method::POST, &uri, json!({"content": "hi"})).await?;
    assert_eq!(anonymous.status, StatusCode::BAD_REQUEST);

    let orphan = app
        .json(
            Method::POST,
            "/api/recipes/999/comments",
            json!({"userId": anna, "content": "hi"}),
        )
        .await?;
    assert_eq!(orphan.status, StatusCode::NOT_FOUND);
    Ok(())
}

#[tokio::test]
async fn only_the_author_can_edit_or_delete_a_comment() -> Result<()> {
    let app = spawn_app().await?;
    let anna = app.register("chef_anna").await?;
    let ben = app.register("chef_ben").await?;
    let recipe = app.create_recipe(anna, "Soup", &[]).await?;
    let created = app
        .json(
            Method::POST,
            &format!("/api/recipes/{recipe}/comments"),
            json!({"userId": ben, "content": "salty"}),
        )
        .await?;
    let comment = created.body["id"].as_i64().unwrap_or_default();
    let uri = format!("/api/recipes/comments/{comment}");

    let edit = app
        .json(Method::PUT, &uri, json!({"userId": anna, "content": "edited"}))
        .await?;
    assert_eq!(edit.status, StatusCode::FORBIDDEN);
    assert_eq!(edit.error(), "Forbidden (not owner)");

    let delete = app.json(Method::DELETE, &uri, json!({"userId": anna})).await?;
    assert_eq!(delete.status, StatusCode::FORBIDDEN);

    let edit = app
        .json(Method::PUT, &uri, json!({"userId": ben, "content": "a bit salty"}))
        .await?;
    assert_eq!(edit.status, StatusCode::OK);
    assert_eq!(edit.message(), "Comment updated");

    let list = app.get(&format!("/api/recipes/{recipe}/comments")).await?;
    assert_eq!(list.body[0]["content"], "a bit salty");

    let delete = app.json(Method::DELETE, &uri, json!({"userId": ben})).await?;
    assert_eq!(delete.status, StatusCode::OK);
    assert_eq!(delete.message(), "Comment deleted");

    let again = app.json(Method::DELETE, &uri, json!({"userId": ben})).await?;
    assert_eq!(again.status, StatusCode::NOT_FOUND);
    assert_eq!(again.error(), "Comment not found");
    Ok(())
}

#[tokio::test]
async fn comment_delete_accepts_query_user_id() -> Result<()> {
    let app = spawn_app().await?;
    let anna = app.register("chef_anna").await?;
    let recipe = app.create_recipe(anna, "Soup", &[]).await?;
    let created = app
        .json(
            Method::POST,
            &format!("/api/recipes/{recipe}/comments"),
            json!({"userId": anna, "content": "note to self"}),
        )
        .await?;
    let comment = created.body["id"].as_i64().unwrap_or_default();

    let no_user = app.delete(&format!("/api/recipes/comments/{comment}")).await?;
    assert_eq!(no_user.status, StatusCode::BAD_REQUEST);

    let res = app
        .delete(&format!("/api/recipes/comments/{comment}?user_id={anna}"))
        .await?;
    assert_eq!(res.status, StatusCode::OK);
    Ok(())
}
