// Integration tests for libris
use libris::transfer::{import_authors, import_books};
use libris::{
    AuthorRecord, BookId, BookRecord, Catalog, Error, NewBook, Recommender, RecommenderConfig,
    StorageConfig, StorageManager, DEFAULT_LIMIT, MAX_FAVORITES,
};

fn create_catalog(categories: &[Option<&str>]) -> Catalog {
    let catalog = Catalog::new();
    let author = catalog.create_author("Test Author");
    for (i, category) in categories.iter().enumerate() {
        let mut book = NewBook::new(format!("Book {}", i + 1), author.id, 1000 + i as u64);
        if let Some(c) = category {
            book = book.with_category(*c);
        }
        catalog.create_book(book).unwrap();
    }
    catalog
}

fn ids(books: &[&libris::Book]) -> Vec<u64> {
    books.iter().map(|b| b.id.0).collect()
}

#[test]
fn test_fiction_ranks_above_cooking() {
    let catalog = create_catalog(&[Some("fiction"), Some("fiction"), Some("cooking")]);
    let books = catalog.books();

    let results = Recommender::default().recommend(&[BookId(1)], &books);
    assert_eq!(ids(&results), vec![2, 3]);
}

#[test]
fn test_six_book_scenario() {
    let catalog = create_catalog(&[
        Some("sci-fi"),
        Some("sci-fi"),
        Some("fantasy"),
        Some("romance"),
        Some("sci-fi"),
        Some("biography"),
    ]);
    let books = catalog.books();

    let results = Recommender::default().recommend(&[BookId(1)], &books);
    assert_eq!(results.len(), DEFAULT_LIMIT);
    assert_eq!(ids(&results[..2]), vec![2, 5]);
    assert!(!results.iter().any(|b| b.id == BookId(1)));
}

#[test]
fn test_missing_categories_fall_back_to_catalog_order() {
    let catalog = create_catalog(&[None, None, Some(""), None]);
    let books = catalog.books();

    let results = Recommender::default().recommend_scored(&[BookId(2)], &books);
    assert_eq!(results.iter().map(|r| r.book.id.0).collect::<Vec<_>>(), vec![1, 3, 4]);
    assert!(results.iter().all(|r| r.score == 0.0));
}

#[test]
fn test_limit_and_exclusion_over_many_seed_sets() {
    let categories = [
        Some("history"),
        Some("history war"),
        Some("war poetry"),
        None,
        Some("poetry"),
        Some("science"),
        Some("science history"),
        Some("cooking"),
        Some("history"),
    ];
    let catalog = create_catalog(&categories);
    let books = catalog.books();
    let recommender = Recommender::new(RecommenderConfig { limit: 3 });

    for start in 0..books.len() {
        for len in 1..=3 {
            let seeds: Vec<BookId> = books.iter().skip(start).take(len).map(|b| b.id).collect();
            let results = recommender.recommend_scored(&seeds, &books);
            assert!(results.len() <= 3);
            for r in &results {
                assert!(!seeds.contains(&r.book.id));
                assert!((0.0..=1.0).contains(&r.score));
            }
            let again = recommender.recommend_scored(&seeds, &books);
            assert_eq!(
                results.iter().map(|r| r.book.id).collect::<Vec<_>>(),
                again.iter().map(|r| r.book.id).collect::<Vec<_>>()
            );
        }
    }
}

#[test]
fn test_catalog_edits_change_recommendations() {
    let temp_dir = tempfile::tempdir().unwrap();
    let storage = StorageManager::new(temp_dir.path()).unwrap();
    let author = storage.catalog().create_author("Test Author");
    let seed = storage
        .catalog()
        .create_book(NewBook::new("Seed", author.id, 1).with_category("gardening"))
        .unwrap();
    let other = storage
        .catalog()
        .create_book(NewBook::new("Other", author.id, 2).with_category("travel"))
        .unwrap();
    let third = storage
        .catalog()
        .create_book(NewBook::new("Third", author.id, 3).with_category("cooking"))
        .unwrap();

    assert_eq!(storage.recommend_for(&[seed.id])[0].id, other.id);

    storage
        .catalog()
        .update_book(third.id, NewBook::new("Third", author.id, 3).with_category("gardening"))
        .unwrap();
    assert_eq!(storage.recommend_for(&[seed.id])[0].id, third.id);
}

#[test]
fn test_favorites_flow() {
    let temp_dir = tempfile::tempdir().unwrap();
    let storage = StorageManager::new(temp_dir.path()).unwrap();
    let author = storage.catalog().create_author("Test Author");
    let categories = ["mystery", "romance", "mystery", "romance", "poetry"];
    let book_ids: Vec<BookId> = categories
        .iter()
        .enumerate()
        .map(|(i, c)| {
            storage
                .catalog()
                .create_book(NewBook::new(format!("Book {}", i), author.id, i as u64).with_category(*c))
                .unwrap()
                .id
        })
        .collect();

    let recs = storage.add_favorite("alice", book_ids[0]).unwrap();
    assert_eq!(recs[0].id, book_ids[2]);

    let err = storage.add_favorite("alice", book_ids[0]).unwrap_err();
    assert!(matches!(err, Error::FavoriteExists { .. }));

    storage.add_favorite("alice", book_ids[1]).unwrap();
    let recs: Vec<BookId> = storage.recommendations("alice").iter().map(|b| b.id).collect();
    assert_eq!(&recs[..2], &[book_ids[2], book_ids[3]]);
    assert!(!recs.contains(&book_ids[0]));
    assert!(!recs.contains(&book_ids[1]));

    storage.remove_favorite("alice", book_ids[1]).unwrap();
    assert_eq!(storage.favorites().books_for("alice"), vec![book_ids[0]]);

    let err = storage.remove_favorite("alice", book_ids[1]).unwrap_err();
    assert!(matches!(err, Error::FavoriteNotFound { .. }));
}

#[test]
fn test_favorites_limit() {
    let temp_dir = tempfile::tempdir().unwrap();
    let storage = StorageManager::new(temp_dir.path()).unwrap();
    let author = storage.catalog().create_author("Test Author");

    for i in 0..=MAX_FAVORITES as u64 {
        storage
            .catalog()
            .create_book(NewBook::new(format!("Book {}", i), author.id, i).with_category("essays"))
            .unwrap();
    }
    let books = storage.catalog().books();
    for book in &books[..MAX_FAVORITES] {
        let recs = storage.add_favorite("alice", book.id).unwrap();
        assert!(recs.len() <= DEFAULT_LIMIT);
    }

    let err = storage.add_favorite("alice", books[MAX_FAVORITES].id).unwrap_err();
    assert!(matches!(err, Error::FavoritesLimit { limit } if limit == MAX_FAVORITES));

    // with every other book a favorite, only the last one is left to recommend
    let recs = storage.recommendations("alice");
    assert_eq!(recs.len(), 1);
    assert_eq!(recs[0].id, books[MAX_FAVORITES].id);
}

#[test]
fn test_persistence_snapshot() {
    let temp_dir = tempfile::tempdir().unwrap();

    let (book_id, author_id) = {
        let storage = StorageManager::new(temp_dir.path()).unwrap();
        let author = storage.catalog().create_author("Italo Calvino");
        let book = storage
            .catalog()
            .create_book(NewBook::new("Invisible Cities", author.id, 42).with_category("fiction").with_price(15))
            .unwrap();
        storage.add_favorite("alice", book.id).unwrap();
        storage.save().unwrap();
        assert!(storage.last_save_time() > 0);
        (book.id, author.id)
    };

    // Reopen storage (simulates restart)
    let storage = StorageManager::new(temp_dir.path()).unwrap();
    let book = storage.catalog().get_book(book_id).unwrap();
    assert_eq!(book.title, "Invisible Cities");
    assert_eq!(book.price, Some(15));
    assert_eq!(storage.catalog().get_author(author_id).unwrap().name, "Italo Calvino");
    assert_eq!(storage.favorites().books_for("alice"), vec![book_id]);

    // ids continue after the restored ones
    let next = storage
        .catalog()
        .create_book(NewBook::new("Cosmicomics", author_id, 43))
        .unwrap();
    assert!(next.id > book_id);
}

#[test]
fn test_custom_limit_through_config() {
    let temp_dir = tempfile::tempdir().unwrap();
    let storage = StorageManager::with_config(StorageConfig {
        data_dir: temp_dir.path().to_path_buf(),
        save_interval: None,
        recommender: RecommenderConfig { limit: 2 },
    })
    .unwrap();
    let author = storage.catalog().create_author("Test Author");
    for i in 0..6 {
        storage
            .catalog()
            .create_book(NewBook::new(format!("Book {}", i), author.id, i).with_category("drama"))
            .unwrap();
    }

    let recs = storage.add_favorite("alice", BookId(1)).unwrap();
    assert_eq!(recs.iter().map(|b| b.id.0).collect::<Vec<_>>(), vec![2, 3]);
}

#[test]
fn test_import_then_recommend() {
    let catalog = Catalog::new();
    import_authors(
        &catalog,
        vec![
            AuthorRecord { name: "Isaac Asimov".to_string() },
            AuthorRecord { name: "Julia Child".to_string() },
        ],
    );

    let record = |title: &str, author: &str, category: &str, isbn: u64| BookRecord {
        title: title.to_string(),
        author: author.to_string(),
        category: Some(category.to_string()),
        isbn,
        price: None,
        rating: None,
        description: None,
    };
    let report = import_books(
        &catalog,
        vec![
            record("Foundation", "Isaac Asimov", "science fiction", 1),
            record("Mastering the Art of French Cooking", "Julia Child", "cooking", 2),
            record("I, Robot", "Isaac Asimov", "science fiction", 3),
            record("Unknown", "Nobody", "poetry", 4),
        ],
    );
    assert_eq!(report.created, 3);
    assert_eq!(report.errors.len(), 1);
    assert_eq!(report.errors[0].row, 4);

    let books = catalog.books();
    let foundation = catalog.find_book_by_isbn(1).unwrap();
    let results = Recommender::default().recommend(&[foundation.id], &books);
    assert_eq!(results[0].isbn, 3);
}
