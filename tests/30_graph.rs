mod common;

use anyhow::Result;
use reqwest::{Client, StatusCode};
use serde_json::{json, Value};

async fn post_json(client: &Client, url: String, payload: Value) -> Result<Value> {
    let res = client
        .post(url)
        .bearer_auth(common::bearer_token())
        .json(&payload)
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::CREATED);
    Ok(res.json::<Value>().await?)
}

async fn get_json(client: &Client, url: String) -> Result<Value> {
    let res = client
        .get(url)
        .bearer_auth(common::bearer_token())
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::OK);
    Ok(res.json::<Value>().await?)
}

#[tokio::test]
async fn demo_fixture_is_loaded_at_startup() -> Result<()> {
    let server = common::ensure_server().await?;
    let client = Client::new();

    // Both demo genres exist, exactly once each.
    for name in ["Fantasy Fiction", "Adventure Fiction"] {
        let hits = get_json(
            &client,
            format!("{}/genres/search/by-name?name={}", server.base_url, name.replace(' ', "%20")),
        )
        .await?;
        assert_eq!(hits.as_array().unwrap().len(), 1, "genre {name}");
    }

    // The demo movie carries both genre edges and the single role edge.
    let hits = get_json(
        &client,
        format!(
            "{}/movies/search/by-title?title=Lord%20of%20the%20Rings",
            server.base_url
        ),
    )
    .await?;
    let movie = &hits.as_array().unwrap()[0];
    assert_eq!(movie["genres"].as_array().unwrap().len(), 2);
    let roles = movie["roles"].as_array().unwrap();
    assert_eq!(roles.len(), 1);
    assert_eq!(roles[0]["actor_name"], "Elijah Wood");
    assert_eq!(roles[0]["role"], "Frodo Baggins");

    // And the actor sees the movie from its side.
    let actors = get_json(&client, format!("{}/actors?size=1000", server.base_url)).await?;
    let elijah = actors["content"]
        .as_array()
        .unwrap()
        .iter()
        .find(|actor| actor["name"] == "Elijah Wood")
        .expect("demo actor present");
    let roles = elijah["roles"].as_array().unwrap();
    assert_eq!(roles.len(), 1);
    assert_eq!(roles[0]["movie_title"], "Lord of the Rings");
    Ok(())
}

#[tokio::test]
async fn wiring_a_role_is_visible_from_both_endpoints() -> Result<()> {
    let server = common::ensure_server().await?;
    let client = Client::new();

    let actor = post_json(
        &client,
        format!("{}/actors", server.base_url),
        json!({ "name": "Ian McKellen" }),
    )
    .await?;
    let movie = post_json(
        &client,
        format!("{}/movies", server.base_url),
        json!({ "title": "The Fellowship" }),
    )
    .await?;
    let actor_id = actor["id"].as_i64().unwrap();
    let movie_id = movie["id"].as_i64().unwrap();

    let updated = post_json(
        &client,
        format!("{}/actors/{}/roles", server.base_url, actor_id),
        json!({ "movie_id": movie_id, "role": "Gandalf" }),
    )
    .await?;
    assert_eq!(updated["roles"].as_array().unwrap().len(), 1);

    let movie = get_json(&client, format!("{}/movies/{}", server.base_url, movie_id)).await?;
    let roles = movie["roles"].as_array().unwrap();
    assert_eq!(roles.len(), 1);
    assert_eq!(roles[0]["actor_id"], actor_id);
    assert_eq!(roles[0]["actor_name"], "Ian McKellen");
    assert_eq!(roles[0]["role"], "Gandalf");

    let actor = get_json(&client, format!("{}/actors/{}", server.base_url, actor_id)).await?;
    let roles = actor["roles"].as_array().unwrap();
    assert_eq!(roles[0]["movie_id"], movie_id);
    assert_eq!(roles[0]["movie_title"], "The Fellowship");
    Ok(())
}

#[tokio::test]
async fn duplicate_role_edges_collapse() -> Result<()> {
    let server = common::ensure_server().await?;
    let client = Client::new();

    let actor = post_json(
        &client,
        format!("{}/actors", server.base_url),
        json!({ "name": "Sean Astin" }),
    )
    .await?;
    let movie = post_json(
        &client,
        format!("{}/movies", server.base_url),
        json!({ "title": "The Return" }),
    )
    .await?;
    let actor_id = actor["id"].as_i64().unwrap();
    let movie_id = movie["id"].as_i64().unwrap();

    for _ in 0..2 {
        post_json(
            &client,
            format!("{}/actors/{}/roles", server.base_url, actor_id),
            json!({ "movie_id": movie_id, "role": "Samwise" }),
        )
        .await?;
    }

    let actor = get_json(&client, format!("{}/actors/{}", server.base_url, actor_id)).await?;
    assert_eq!(actor["roles"].as_array().unwrap().len(), 1);
    Ok(())
}

#[tokio::test]
async fn adding_a_genre_twice_keeps_one_edge() -> Result<()> {
    let server = common::ensure_server().await?;
    let client = Client::new();

    let genre = post_json(
        &client,
        format!("{}/genres", server.base_url),
        json!({ "name": "Epic" }),
    )
    .await?;
    let movie = post_json(
        &client,
        format!("{}/movies", server.base_url),
        json!({ "title": "The Two Towers" }),
    )
    .await?;
    let genre_id = genre["id"].as_i64().unwrap();
    let movie_id = movie["id"].as_i64().unwrap();

    for _ in 0..2 {
        post_json(
            &client,
            format!("{}/movies/{}/genres", server.base_url, movie_id),
            json!({ "genre_id": genre_id }),
        )
        .await?;
    }

    let movie = get_json(&client, format!("{}/movies/{}", server.base_url, movie_id)).await?;
    let genres = movie["genres"].as_array().unwrap();
    assert_eq!(genres.len(), 1);
    assert_eq!(genres[0]["name"], "Epic");
    Ok(())
}

#[tokio::test]
async fn deleting_an_actor_detaches_it_from_movies() -> Result<()> {
    let server = common::ensure_server().await?;
    let client = Client::new();

    let actor = post_json(
        &client,
        format!("{}/actors", server.base_url),
        json!({ "name": "Temporary Actor" }),
    )
    .await?;
    let movie = post_json(
        &client,
        format!("{}/movies", server.base_url),
        json!({ "title": "Detached" }),
    )
    .await?;
    let actor_id = actor["id"].as_i64().unwrap();
    let movie_id = movie["id"].as_i64().unwrap();

    post_json(
        &client,
        format!("{}/actors/{}/roles", server.base_url, actor_id),
        json!({ "movie_id": movie_id, "role": "Extra" }),
    )
    .await?;

    let res = client
        .delete(format!("{}/actors/{}", server.base_url, actor_id))
        .bearer_auth(common::bearer_token())
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::NO_CONTENT);

    let movie = get_json(&client, format!("{}/movies/{}", server.base_url, movie_id)).await?;
    assert_eq!(movie["roles"].as_array().unwrap().len(), 0);
    Ok(())
}

#[tokio::test]
async fn wiring_a_role_to_an_unknown_movie_is_not_found() -> Result<()> {
    let server = common::ensure_server().await?;
    let client = Client::new();

    let actor = post_json(
        &client,
        format!("{}/actors", server.base_url),
        json!({ "name": "Lost Actor" }),
    )
    .await?;
    let actor_id = actor["id"].as_i64().unwrap();

    let res = client
        .post(format!("{}/actors/{}/roles", server.base_url, actor_id))
        .bearer_auth(common::bearer_token())
        .json(&json!({ "movie_id": 999999, "role": "Nobody" }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);

    let body = res.json::<Value>().await?;
    assert_eq!(body["status"], "404 NOT_FOUND");
    Ok(())
}

#[tokio::test]
async fn pagination_slices_and_sorts() -> Result<()> {
    let server = common::ensure_server().await?;
    let client = Client::new();

    for name in ["Zeta One", "Zeta Two", "Zeta Three"] {
        post_json(
            &client,
            format!("{}/genres", server.base_url),
            json!({ "name": name }),
        )
        .await?;
    }

    let page = get_json(&client, format!("{}/genres?page=0&size=2", server.base_url)).await?;
    assert_eq!(page["content"].as_array().unwrap().len(), 2);
    assert_eq!(page["number"], 0);
    assert_eq!(page["size"], 2);
    // 2 demo genres + the 3 created here, at minimum.
    assert!(page["total_elements"].as_u64().unwrap() >= 5);
    assert!(page["total_pages"].as_u64().unwrap() >= 3);

    let next = get_json(&client, format!("{}/genres?page=1&size=2", server.base_url)).await?;
    assert_eq!(next["number"], 1);
    assert!(!next["content"].as_array().unwrap().is_empty());

    let sorted = get_json(
        &client,
        format!("{}/genres?size=1000&sort=name,desc", server.base_url),
    )
    .await?;
    let names: Vec<String> = sorted["content"]
        .as_array()
        .unwrap()
        .iter()
        .map(|genre| genre["name"].as_str().unwrap().to_string())
        .collect();
    let mut expected = names.clone();
    expected.sort_by(|a, b| b.cmp(a));
    assert_eq!(names, expected);
    Ok(())
}
