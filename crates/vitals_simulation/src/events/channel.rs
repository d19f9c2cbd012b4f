//! EventHandler — типизированный pub/sub канал для одного event kind
//!
//! Каждый kind (HealthGained, DamageTaken, Death, HazardEnter, ...) — отдельный
//! `EventHandler<E>` со своим списком подписчиков.
//!
//! Семантика:
//! - `subscribe` возвращает `SubscriptionId`, `unsubscribe` по id (повторный — no-op)
//! - `invoke` вызывает всех подписчиков синхронно, в порядке подписки
//! - перед вызовом берётся snapshot списка, mutex НЕ держится во время handler'ов
//!   (handler может subscribe/unsubscribe в тот же канал)
//! - канал не владеет lifetime слушателей: отписка — ответственность вызывающего

use std::sync::{Arc, Mutex, MutexGuard};

/// Токен подписки (уникален в пределах одного канала)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SubscriptionId(u64);

type Handler<E> = Arc<dyn Fn(&E) + Send + Sync>;

struct Subscribers<E> {
    next_id: u64,
    handlers: Vec<(SubscriptionId, Handler<E>)>,
}

/// Subscriber list для одного event kind.
///
/// `Clone` делит тот же список (как ScriptableObject-канал, на который
/// ссылаются несколько владельцев).
pub struct EventHandler<E> {
    inner: Arc<Mutex<Subscribers<E>>>,
}

impl<E> Default for EventHandler<E> {
    fn default() -> Self {
        Self {
            inner: Arc::new(Mutex::new(Subscribers {
                next_id: 0,
                handlers: Vec::new(),
            })),
        }
    }
}

impl<E> Clone for EventHandler<E> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<E> std::fmt::Debug for EventHandler<E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventHandler")
            .field("subscribers", &self.len())
            .finish()
    }
}

impl<E> EventHandler<E> {
    pub fn new() -> Self {
        Self::default()
    }

    // Poisoned mutex: handler паниковал в другом потоке, список при этом валиден
    fn lock(&self) -> MutexGuard<'_, Subscribers<E>> {
        self.inner.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Подписка. Повторная подписка того же handler'а допустима — получит новый id.
    pub fn subscribe(&self, handler: impl Fn(&E) + Send + Sync + 'static) -> SubscriptionId {
        let mut subscribers = self.lock();
        let id = SubscriptionId(subscribers.next_id);
        subscribers.next_id += 1;
        subscribers.handlers.push((id, Arc::new(handler)));
        id
    }

    /// Отписка. Возвращает false если id уже отписан (или чужой).
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        let mut subscribers = self.lock();
        let before = subscribers.handlers.len();
        subscribers.handlers.retain(|(existing, _)| *existing != id);
        subscribers.handlers.len() != before
    }

    /// Синхронный вызов всех подписчиков (snapshot на момент вызова)
    pub fn invoke(&self, event: &E) {
        let snapshot: Vec<Handler<E>> = self
            .lock()
            .handlers
            .iter()
            .map(|(_, handler)| Arc::clone(handler))
            .collect();

        for handler in snapshot {
            handler(event);
        }
    }

    pub fn len(&self) -> usize {
        self.lock().handlers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn clear(&self) {
        self.lock().handlers.clear();
    }
}

impl<E: Clone + Send + 'static> EventHandler<E> {
    /// Подписка-буфер: копии событий складываются в `Inbox`,
    /// ECS система забирает их позже в этом же шаге (`Inbox::drain`).
    pub fn subscribe_inbox(&self) -> (SubscriptionId, Inbox<E>) {
        let inbox = Inbox::default();
        let sink = inbox.clone();
        let id = self.subscribe(move |event: &E| sink.push(event.clone()));
        (id, inbox)
    }
}

/// Буфер событий между pub/sub каналом и ECS системами
pub struct Inbox<E> {
    items: Arc<Mutex<Vec<E>>>,
}

impl<E> Default for Inbox<E> {
    fn default() -> Self {
        Self {
            items: Arc::new(Mutex::new(Vec::new())),
        }
    }
}

impl<E> Clone for Inbox<E> {
    fn clone(&self) -> Self {
        Self {
            items: Arc::clone(&self.items),
        }
    }
}

impl<E> std::fmt::Debug for Inbox<E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Inbox").field("pending", &self.lock().len()).finish()
    }
}

impl<E> Inbox<E> {
    fn lock(&self) -> MutexGuard<'_, Vec<E>> {
        self.items.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub fn push(&self, item: E) {
        self.lock().push(item);
    }

    /// Забрать всё накопленное (в порядке поступления)
    pub fn drain(&self) -> Vec<E> {
        std::mem::take(&mut *self.lock())
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }
}
