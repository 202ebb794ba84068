use postform_core::{Author, AuthorId, Category, CategoryId, Post, PostDraft, PostId};

fn sample_post() -> Post {
    Post {
        id: PostId(7),
        title: "T1".to_string(),
        content: "C1".to_string(),
        author: Author {
            id: AuthorId(3),
            name: "Au1".to_string(),
        },
        categories: vec![Category {
            id: CategoryId(5),
            name: "Cat1".to_string(),
        }],
    }
}

#[test]
fn post_serialization_uses_plain_integer_ids() {
    let json = serde_json::to_value(sample_post()).unwrap();

    assert_eq!(json["id"], 7);
    assert_eq!(json["author"]["id"], 3);
    assert_eq!(json["author"]["name"], "Au1");
    assert_eq!(json["categories"][0]["id"], 5);
    assert_eq!(json["categories"][0]["name"], "Cat1");
}

#[test]
fn row_projection_keeps_id_title_content() {
    let row = sample_post().row();
    assert_eq!(row.id, PostId(7));
    assert_eq!(row.title, "T1");
    assert_eq!(row.content, "C1");
}

#[test]
fn draft_serializes_four_named_fields() {
    let draft = PostDraft::new().with_title("hello");
    let json = serde_json::to_value(&draft).unwrap();
    assert_eq!(
        json,
        serde_json::json!({
            "author": "",
            "category": "",
            "title": "hello",
            "content": "",
        })
    );
}
