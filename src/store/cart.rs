use std::{
  fmt,
  sync::{
    Arc, Mutex, PoisonError, RwLock, Weak,
    atomic::{AtomicU64, Ordering},
  },
};

use rust_decimal::Decimal;
use tracing::{debug, error, warn};
use ulid::Ulid;

use crate::{
  models::{
    cart::{CartLineItem, CartSnapshot, PersistedCartLine, parse_quantity},
    errors::CartError,
    product::ProductId,
  },
  store::storage::{
    KeyValueStore,
    errors::{StorageError, StorageErrorType, handle_json_error},
  },
  utils::money::parse_price,
};

pub const CART_STORAGE_KEY: &str = "storefront.cart";

type Listener = Arc<dyn Fn(&Arc<CartSnapshot>) + Send + Sync>;

struct CartStoreInner {
  session_id: Ulid,
  current: RwLock<Arc<CartSnapshot>>,
  listeners: Mutex<Vec<(u64, Listener)>>,
  next_listener_id: AtomicU64,
}

/// The one cart of a browsing session.
///
/// Cloning hands out another handle to the same cart: every reader sees the
/// same lines and every write goes through the operations below. Listeners
/// registered with [`CartStore::subscribe`] run synchronously after each
/// mutation that changed the cart, with the snapshot taken right after it.
///
/// Writes from several threads are serialized, but their notifications may
/// reach listeners out of order. Listeners that keep a snapshot should compare
/// [`CartSnapshot::version`] before replacing it.
#[derive(Clone)]
pub struct CartStore {
  inner: Arc<CartStoreInner>,
}

/// Handle returned by [`CartStore::subscribe`].
#[must_use = "dropping the handle keeps the listener registered, call `unsubscribe` to remove it"]
pub struct Subscription {
  id: u64,
  store: Weak<CartStoreInner>,
}

impl Subscription {
  pub fn unsubscribe(self) {
    if let Some(inner) = self.store.upgrade() {
      let mut listeners = inner.listeners.lock().unwrap_or_else(PoisonError::into_inner);
      listeners.retain(|(id, _)| *id != self.id);
    }
  }
}

impl fmt::Debug for Subscription {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("Subscription").field("id", &self.id).finish()
  }
}

impl fmt::Debug for CartStore {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    let current = self.snapshot();
    f.debug_struct("CartStore")
      .field("session_id", &self.inner.session_id)
      .field("lines", &current.items().len())
      .finish()
  }
}

impl Default for CartStore {
  fn default() -> Self {
    Self::new()
  }
}

impl CartStore {
  pub fn new() -> Self {
    Self::with_snapshot(CartSnapshot::empty())
  }

  fn with_snapshot(snapshot: CartSnapshot) -> Self {
    Self {
      inner: Arc::new(CartStoreInner {
        session_id: Ulid::new(),
        current: RwLock::new(Arc::new(snapshot)),
        listeners: Mutex::new(vec![]),
        next_listener_id: AtomicU64::new(0),
      }),
    }
  }

  pub fn session_id(&self) -> Ulid {
    self.inner.session_id
  }

  pub fn add_item(
    &self,
    product_id: impl Into<ProductId>,
    unit_price: Decimal,
    name: impl Into<String>,
    image: Option<String>,
    quantity: u32,
  ) -> Result<Arc<CartSnapshot>, CartError> {
    let product_id = product_id.into();
    if product_id.is_empty() {
      warn!(path = "storefront.store.cart.add_item", "rejected add with empty product id");
      return Err(CartError::EmptyProductId);
    }
    if quantity == 0 {
      warn!(path = "storefront.store.cart.add_item", %product_id, "rejected add with quantity 0");
      return Err(CartError::InvalidQuantity { quantity: 0 });
    }
    if unit_price.is_sign_negative() {
      warn!(path = "storefront.store.cart.add_item", %product_id, %unit_price, "rejected negative price");
      return Err(CartError::InvalidPrice { input: unit_price.to_string() });
    }

    let name = name.into();
    let (snapshot, _) = self.mutate(|items| {
      match items.iter_mut().find(|l| l.product_id == product_id) {
        Some(line) => {
          let total = line.quantity.checked_add(quantity).ok_or(CartError::InvalidQuantity {
            quantity: i64::from(line.quantity) + i64::from(quantity),
          })?;
          line.quantity = total;
        }
        None => items.push(CartLineItem {
          product_id: product_id.clone(),
          name,
          unit_price,
          image,
          quantity,
        }),
      }
      Ok(true)
    })
    .inspect_err(|err| {
      warn!(path = "storefront.store.cart.add_item", %product_id, %err, "rejected add");
    })?;

    debug!(%product_id, quantity, count = snapshot.count(), "cart item added");
    Ok(snapshot)
  }

  /// Form-input variant of [`CartStore::add_item`] for prices that arrive as
  /// text. Anything that is not a non-negative number is `InvalidPrice`.
  pub fn add_item_from_input(
    &self,
    product_id: impl Into<ProductId>,
    unit_price: &str,
    name: impl Into<String>,
    image: Option<String>,
    quantity: u32,
  ) -> Result<Arc<CartSnapshot>, CartError> {
    let product_id = product_id.into();
    let unit_price = parse_price(unit_price).inspect_err(|err| {
      warn!(path = "storefront.store.cart.add_item_from_input", %product_id, %err, "rejected price");
    })?;
    self.add_item(product_id, unit_price, name, image, quantity)
  }

  /// Removing a product that is not in the cart is a no-op.
  pub fn remove_item(&self, product_id: &ProductId) -> Arc<CartSnapshot> {
    let result = self.mutate(|items| {
      let before = items.len();
      items.retain(|l| &l.product_id != product_id);
      Ok(items.len() != before)
    });

    match result {
      Ok((snapshot, true)) => {
        debug!(%product_id, count = snapshot.count(), "cart item removed");
        snapshot
      }
      Ok((snapshot, false)) => snapshot,
      Err(_) => self.snapshot(),
    }
  }

  /// Zero or a negative quantity removes the line. Setting the quantity of a
  /// product that is not in the cart changes nothing.
  pub fn set_quantity(
    &self,
    product_id: &ProductId,
    quantity: i64,
  ) -> Result<Arc<CartSnapshot>, CartError> {
    if quantity <= 0 {
      return Ok(self.remove_item(product_id));
    }

    let quantity = u32::try_from(quantity).map_err(|_| {
      warn!(path = "storefront.store.cart.set_quantity", %product_id, quantity, "quantity out of range");
      CartError::InvalidQuantity { quantity }
    })?;

    let (snapshot, changed) = self
      .mutate(|items| {
        let line = items.iter_mut().find(|l| &l.product_id == product_id);
        match line {
          Some(line) if line.quantity != quantity => {
            line.quantity = quantity;
            Ok(true)
          }
          _ => Ok(false),
        }
      })
      .inspect_err(|err| {
        warn!(path = "storefront.store.cart.set_quantity", %product_id, %err, "rejected quantity");
      })?;

    if changed {
      debug!(%product_id, quantity, count = snapshot.count(), "cart quantity set");
    }
    Ok(snapshot)
  }

  /// Form-input variant of [`CartStore::set_quantity`].
  pub fn set_quantity_from_input(
    &self,
    product_id: &ProductId,
    input: &str,
  ) -> Result<Arc<CartSnapshot>, CartError> {
    let quantity = parse_quantity(input).inspect_err(|err| {
      warn!(path = "storefront.store.cart.set_quantity_from_input", %product_id, %err, "rejected quantity");
    })?;
    self.set_quantity(product_id, quantity)
  }

  pub fn clear(&self) -> Arc<CartSnapshot> {
    let result = self.mutate(|items| {
      let changed = !items.is_empty();
      items.clear();
      Ok(changed)
    });

    match result {
      Ok((snapshot, true)) => {
        debug!(session_id = %self.inner.session_id, "cart cleared");
        snapshot
      }
      Ok((snapshot, false)) => snapshot,
      Err(_) => self.snapshot(),
    }
  }

  pub fn snapshot(&self) -> Arc<CartSnapshot> {
    self.inner.current.read().unwrap_or_else(PoisonError::into_inner).clone()
  }

  pub fn line(&self, product_id: &ProductId) -> Option<CartLineItem> {
    self.snapshot().line(product_id).cloned()
  }

  pub fn is_empty(&self) -> bool {
    self.snapshot().is_empty()
  }

  pub fn subscribe<F>(&self, listener: F) -> Subscription
  where
    F: Fn(&Arc<CartSnapshot>) + Send + Sync + 'static,
  {
    let id = self.inner.next_listener_id.fetch_add(1, Ordering::Relaxed);
    let mut listeners = self.inner.listeners.lock().unwrap_or_else(PoisonError::into_inner);
    listeners.push((id, Arc::new(listener)));

    Subscription { id, store: Arc::downgrade(&self.inner) }
  }

  pub fn listener_count(&self) -> usize {
    self.inner.listeners.lock().unwrap_or_else(PoisonError::into_inner).len()
  }

  // Applies `op` to a copy of the lines under the write lock. The copy is
  // committed only once its totals are computed, so an overflowing line is
  // rejected with the cart untouched. Listeners run after the lock is gone so
  // they may read or write the cart themselves. `op` returns whether anything
  // changed.
  fn mutate<F>(&self, op: F) -> Result<(Arc<CartSnapshot>, bool), CartError>
  where
    F: FnOnce(&mut Vec<CartLineItem>) -> Result<bool, CartError>,
  {
    let snapshot = {
      let mut current = self.inner.current.write().unwrap_or_else(PoisonError::into_inner);
      let mut staged = current.items().to_vec();
      if !op(&mut staged)? {
        return Ok((current.clone(), false));
      }

      let next = Arc::new(CartSnapshot::from_items(staged, current.version() + 1)?);
      *current = next.clone();
      next
    };

    self.notify(&snapshot);
    Ok((snapshot, true))
  }

  fn notify(&self, snapshot: &Arc<CartSnapshot>) {
    let listeners: Vec<Listener> = {
      let listeners = self.inner.listeners.lock().unwrap_or_else(PoisonError::into_inner);
      listeners.iter().map(|(_, l)| l.clone()).collect()
    };

    for listener in listeners {
      listener(snapshot);
    }
  }

  pub fn to_records(&self) -> Vec<PersistedCartLine> {
    self.snapshot().items().iter().map(PersistedCartLine::from).collect()
  }

  /// Rebuilds a cart from stored records. Records for the same product are
  /// merged; zero quantities, blank ids, negative prices and records whose
  /// totals would overflow are dropped.
  pub fn from_records(records: Vec<PersistedCartLine>) -> Self {
    let mut snapshot = CartSnapshot::empty();

    for record in records {
      if record.quantity == 0 || record.product_id.is_empty() {
        continue;
      }
      if record.unit_price_at_add.is_sign_negative() {
        warn!(product_id = %record.product_id, "dropping stored cart line with negative price");
        continue;
      }

      let mut staged = snapshot.items().to_vec();
      match staged.iter_mut().find(|l| l.product_id == record.product_id) {
        Some(line) => match line.quantity.checked_add(record.quantity) {
          Some(total) => line.quantity = total,
          None => {
            warn!(product_id = %record.product_id, "dropping stored cart line, quantity overflows");
            continue;
          }
        },
        None => staged.push(CartLineItem {
          product_id: record.product_id.clone(),
          name: record.name,
          unit_price: record.unit_price_at_add,
          image: record.image,
          quantity: record.quantity,
        }),
      }

      match CartSnapshot::from_items(staged, 0) {
        Ok(next) => snapshot = next,
        Err(err) => {
          warn!(product_id = %record.product_id, %err, "dropping stored cart line, totals overflow")
        }
      }
    }

    Self::with_snapshot(snapshot)
  }

  pub fn save(&self, storage: &dyn KeyValueStore) -> Result<(), StorageError> {
    let json = encode_records(&self.to_records(), "storefront.store.cart.save")?;
    storage.set(CART_STORAGE_KEY, &json)
  }

  /// Missing storage entry means a fresh, empty cart.
  pub fn restore(storage: &dyn KeyValueStore) -> Result<Self, StorageError> {
    let path = "storefront.store.cart.restore";
    let Some(json) = storage.get(CART_STORAGE_KEY)? else {
      return Ok(Self::new());
    };

    let records: Vec<PersistedCartLine> =
      serde_json::from_str(&json).map_err(|err| handle_json_error(err, path, CART_STORAGE_KEY))?;

    let store = Self::from_records(records);
    debug!(session_id = %store.session_id(), lines = store.to_records().len(), "cart restored");
    Ok(store)
  }

  /// Saves the cart after every change until the subscription is dropped via
  /// `unsubscribe`. Storage failures are logged; the cart itself is unaffected.
  pub fn persist_to(&self, storage: Arc<dyn KeyValueStore>) -> Subscription {
    self.subscribe(move |snapshot| {
      let records: Vec<PersistedCartLine> =
        snapshot.items().iter().map(PersistedCartLine::from).collect();

      let saved = encode_records(&records, "storefront.store.cart.persist_to")
        .and_then(|json| storage.set(CART_STORAGE_KEY, &json));

      if let Err(err) = saved {
        error!(%err, "failed to persist cart");
      }
    })
  }
}

fn encode_records(records: &[PersistedCartLine], path: &str) -> Result<String, StorageError> {
  serde_json::to_string(records).map_err(|err| {
    StorageError::new(
      StorageErrorType::JsonMarshal,
      Some(Box::new(err)),
      "failed to encode cart",
      path,
      format!("key: {}", CART_STORAGE_KEY),
    )
  })
}
