/*!
 * MemFS Tests
 * Flat in-memory filesystem behind the descriptor tables
 */

use std::sync::Arc;
use std::thread;

use userprog_kernel::vfs::{FileSystem, MemFS, VfsError};

#[test]
fn test_memfs_basic() {
    let fs = MemFS::new();

    fs.create("test", 5).unwrap();
    assert!(fs.exists("test"));
    assert!(!fs.exists("missing"));

    let mut file = fs.open("test").unwrap();
    assert_eq!(file.write(b"hello").unwrap(), 5);
    assert_eq!(fs.contents("test").unwrap(), b"hello");

    drop(file);
    fs.remove("test").unwrap();
    assert!(!fs.exists("test"));
}

#[test]
fn test_create_existing() {
    let fs = MemFS::new();
    fs.create("dup", 0).unwrap();
    assert!(matches!(fs.create("dup", 4), Err(VfsError::AlreadyExists(_))));
}

#[test]
fn test_capacity_limit() {
    let fs = MemFS::with_capacity(10);

    fs.create("small", 5).unwrap();
    assert!(matches!(fs.create("large", 11), Err(VfsError::OutOfSpace)));

    // Removing gives the space back
    fs.remove("small").unwrap();
    fs.create("large", 10).unwrap();
}

#[test]
fn test_open_count_tracks_handles() {
    let fs = MemFS::new();
    fs.insert("f", b"abc").unwrap();

    let a = fs.open("f").unwrap();
    let b = fs.open("f").unwrap();
    assert_eq!(fs.open_count(), 2);
    drop(a);
    assert_eq!(fs.open_count(), 1);
    drop(b);
    assert_eq!(fs.open_count(), 0);
}

#[test]
fn test_concurrent_creates_have_one_winner() {
    let fs = Arc::new(MemFS::new());
    let handles: Vec<_> = (0..8)
        .map(|_| {
            let fs = Arc::clone(&fs);
            thread::spawn(move || fs.create("race", 1).is_ok())
        })
        .collect();

    let winners = handles
        .into_iter()
        .map(|h| h.join().unwrap())
        .filter(|&won| won)
        .count();
    assert_eq!(winners, 1);
}
