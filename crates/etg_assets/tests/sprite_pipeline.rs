use camino::Utf8PathBuf;
use etg_assets::{handle_sprites, AnimationSpriteCache, AssetMap, SpriteCollection, SpriteFrame};
use std::fs;
use std::sync::Arc;
use tempfile::tempdir;

fn init_logging() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

fn create_hero_mod() -> tempfile::TempDir {
    let dir = tempdir().unwrap();
    let hero = dir.path().join("sprites/hero");
    fs::create_dir_all(&hero).unwrap();
    fs::write(hero.join("hero_idle_0.png"), b"idle0").unwrap();
    fs::write(hero.join("hero_idle_1.png"), b"idle1").unwrap();
    dir
}

#[test]
fn test_crawl_consolidate_and_group() {
    init_logging();
    let dir = create_hero_mod();
    let root = Utf8PathBuf::from_path_buf(dir.path().to_path_buf()).unwrap();

    let mut map = AssetMap::default();
    map.crawl_dir(&root).unwrap();
    assert_eq!(map.sprite_collection("hero").unwrap().unprocessed_count(), 2);

    let mut hero = SpriteCollection::new("hero", Vec::new());
    let report = handle_sprites(&mut map, &mut hero);
    assert_eq!(report.frames_added, 2);
    assert_eq!(map.sprite_collection("hero").unwrap().unprocessed_count(), 0);

    let mut cache = AnimationSpriteCache::new();
    let frames = cache.rescan_and_get_frames(&hero, "hero", "idle").unwrap();
    let indices: Vec<usize> = frames.iter().map(|f| f.index).collect();
    assert_eq!(indices, vec![0, 1]);

    // Frame sources point at the crawled files.
    let frame = &hero.frames()[1];
    assert_eq!(frame.name, "hero_idle_1");
    let bytes = frame.source.as_ref().unwrap().read_all().unwrap().unwrap();
    assert_eq!(bytes, b"idle1".to_vec());
}

#[test]
fn test_second_mod_extends_existing_collection() {
    init_logging();
    let first = create_hero_mod();
    let second = tempdir().unwrap();
    let hero = second.path().join("sprites/hero");
    fs::create_dir_all(&hero).unwrap();
    fs::write(hero.join("hero_idle_1.png"), b"idle1-v2").unwrap();
    fs::write(hero.join("hero_fire_0.png"), b"fire0").unwrap();

    let mut map = AssetMap::default();
    map.crawl_dir(&Utf8PathBuf::from_path_buf(first.path().to_path_buf()).unwrap())
        .unwrap();

    let mut collection = SpriteCollection::new(
        "hero",
        vec![SpriteFrame::new("hero_idle_0"), SpriteFrame::new("hero_idle_1")],
    );
    handle_sprites(&mut map, &mut collection);

    let mut cache = AnimationSpriteCache::new();
    assert!(cache.update_collection(&collection));
    let scanned = collection.frames().clone();

    map.crawl_dir(&Utf8PathBuf::from_path_buf(second.path().to_path_buf()).unwrap())
        .unwrap();
    let report = handle_sprites(&mut map, &mut collection);
    assert_eq!(report.frames_replaced, 1);
    assert_eq!(report.frames_added, 1);
    assert!(!Arc::ptr_eq(&scanned, collection.frames()));

    let fire = cache.rescan_and_get_frames(&collection, "hero", "fire").unwrap();
    assert_eq!(fire.len(), 1);
    assert_eq!(fire[0].index, 2);

    let source = collection.frames()[1].source.as_ref().unwrap();
    assert_eq!(source.read_all().unwrap().unwrap(), b"idle1-v2".to_vec());
}
