/* tests/holder_tests.rs */

use std::sync::Arc;

use bundle_live::holder::Holder;

#[test]
fn test_holder_publish_get() {
	let holder = Holder::<i32>::new();
	assert!(holder.is_empty());
	assert!(holder.get().is_none());

	let meta = holder.publish(Arc::new(42));
	assert_eq!(meta.version, 1);
	assert_eq!(*holder.get().unwrap(), 42);

	holder.publish(Arc::new(7));
	assert_eq!(*holder.get().unwrap(), 7);
	assert_eq!(holder.meta().unwrap().version, 2);
}

#[test]
fn test_readers_keep_their_snapshot() {
	let holder = Holder::<String>::new();
	holder.publish(Arc::new("old".to_string()));
	let held = holder.get().unwrap();

	holder.publish(Arc::new("new".to_string()));
	assert_eq!(*held, "old");
	assert_eq!(*holder.entry().unwrap().value, "new");
}

#[cfg(feature = "events")]
#[tokio::test]
async fn test_holder_events() {
	use bundle_live::holder::HoldEvent;

	let holder = Holder::<i32>::new();
	let mut rx = holder.subscribe();

	holder.publish(Arc::new(1));
	holder.publish(Arc::new(2));

	match rx.recv().await.unwrap() {
		HoldEvent::Loaded { value, meta } => {
			assert_eq!(*value, 1);
			assert_eq!(meta.version, 1);
		}
		other => panic!("Expected Loaded, got {:?}", other),
	}
	match rx.recv().await.unwrap() {
		HoldEvent::Updated { old, new, .. } => {
			assert_eq!(*old, 1);
			assert_eq!(*new, 2);
		}
		other => panic!("Expected Updated, got {:?}", other),
	}
}
