//! Timer — примитив для time-bounded состояний
//!
//! Используется для:
//! - invincibility window после удара (Health)
//! - attack/melee cooldowns (Shooter)
//! - ammo recharge (Shooter, через `tick_reversed`)
//! - deferred effects (задержка перед follow-up pulse / despawn)
//!
//! Хранит нормализованный `value` в [0, 1]:
//! - `tick` ведёт value от 1 к 0 (доля оставшегося времени)
//! - `tick_reversed` ведёт value от 0 к 1 (доля накопленного заряда)
//!
//! Таймер создаётся один раз на владельца и переиспользуется (start/stop циклы).

// Накопленная погрешность f32 при шаге 1/60 (6 шагов по 1/60 = 0.1 сек)
const VALUE_EPSILON: f32 = 1e-5;

/// Countdown/count-up таймер с `active` предикатом.
///
/// Инвариант: `active` становится false ровно когда value достигает границы.
/// Все входы клампятся, ошибок нет.
#[derive(Debug, Clone, PartialEq)]
pub struct Timer {
    duration: f32,
    value: f32,
    active: bool,
}

impl Default for Timer {
    fn default() -> Self {
        Self {
            duration: 0.0,
            value: 0.0,
            active: false,
        }
    }
}

impl Timer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Таймер с заданной длительностью (не запущен)
    pub fn with_duration(seconds: f32) -> Self {
        let mut timer = Self::default();
        timer.set_duration(seconds);
        timer
    }

    /// Граница для следующих `start()`.
    ///
    /// Запущенный таймер сохраняет текущую долю прогресса (value не пересчитывается).
    pub fn set_duration(&mut self, seconds: f32) {
        self.duration = if seconds.is_finite() { seconds.max(0.0) } else { 0.0 };
    }

    pub fn duration(&self) -> f32 {
        self.duration
    }

    /// Сброс прогресса в ноль, active = true.
    ///
    /// Перезапуск активного таймера отбрасывает прошлый прогресс (без stacking).
    /// Нулевая длительность → таймер сразу неактивен.
    pub fn start(&mut self) {
        self.value = 1.0;
        self.active = self.duration > 0.0;
        if !self.active {
            self.value = 0.0;
        }
    }

    pub fn stop(&mut self) {
        self.active = false;
    }

    /// Прогресс на `delta` секунд (value → 0)
    pub fn tick(&mut self, delta: f32) {
        if !self.active || !delta.is_finite() || delta < 0.0 {
            return;
        }

        if self.duration <= 0.0 {
            self.value = 0.0;
            self.active = false;
            return;
        }

        self.value -= delta / self.duration;
        if self.value <= VALUE_EPSILON {
            self.value = 0.0;
            self.active = false;
        }
    }

    /// Recharge семантика: value → 1.
    ///
    /// Читатели смотрят на сам value (например доля доступных зарядов),
    /// поэтому тикает независимо от `active`; active = value ещё не на границе.
    pub fn tick_reversed(&mut self, delta: f32) {
        if !delta.is_finite() || delta < 0.0 {
            return;
        }

        if self.duration <= 0.0 {
            self.value = 1.0;
            self.active = false;
            return;
        }

        self.value = (self.value + delta / self.duration).min(1.0);
        self.active = self.value < 1.0;
    }

    /// Нормализованный прогресс [0, 1]
    pub fn value(&self) -> f32 {
        self.value
    }

    /// Прямая запись value (квантованное потребление заряда).
    ///
    /// Не перезапускает таймер и не трогает `active`.
    pub fn set_value(&mut self, value: f32) {
        self.value = if value.is_finite() { value.clamp(0.0, 1.0) } else { 0.0 };
    }

    pub fn active(&self) -> bool {
        self.active
    }

    /// Оставшееся время (секунды) для countdown режима
    pub fn remaining(&self) -> f32 {
        if self.active {
            self.value * self.duration
        } else {
            0.0
        }
    }
}
