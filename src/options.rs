use crate::{
    filter::traits::{Filter, ParamSpec},
    foundation::error::{StrataError, StrataResult},
};

/// Verdict of a pre-change listener on a proposed value.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum OptionChange {
    /// Keep the proposal.
    Accept,
    /// Replace the proposal (it is clamped and snapped again).
    Adjust(f64),
    /// Drop the change.
    Cancel,
}

type PreChangeListener = Box<dyn FnMut(&str, f64, f64) -> OptionChange + Send>;
type ChangeListener = Box<dyn FnMut(&str, f64) + Send>;

/// Bounded numeric option with change notification.
///
/// Values are clamped to `[min, max]` and snapped to `min + k * step`.
pub struct NumericOption {
    name: String,
    value: f64,
    min: f64,
    max: f64,
    step: f64,
    pre_change: Vec<PreChangeListener>,
    on_change: Vec<ChangeListener>,
}

impl NumericOption {
    /// Build an option; `value` is constrained to the bounds.
    pub fn new(
        name: impl Into<String>,
        value: f64,
        min: f64,
        max: f64,
        step: f64,
    ) -> StrataResult<Self> {
        let name = name.into();
        if !(min.is_finite() && max.is_finite() && step.is_finite()) || min > max || step < 0.0 {
            return Err(StrataError::validation(format!(
                "option '{name}' has invalid bounds [{min}, {max}] step {step}"
            )));
        }
        if value.is_nan() {
            return Err(StrataError::validation(format!(
                "option '{name}' value must be a number"
            )));
        }
        let mut opt = Self {
            name,
            value: min,
            min,
            max,
            step,
            pre_change: Vec::new(),
            on_change: Vec::new(),
        };
        opt.value = opt.constrain(value);
        Ok(opt)
    }

    /// Option mirroring a filter parameter.
    pub fn from_param(param: &ParamSpec) -> StrataResult<Self> {
        Self::new(
            param.name.clone(),
            param.value,
            param.min,
            param.max,
            param.step,
        )
    }

    /// Option name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Current value.
    pub fn value(&self) -> f64 {
        self.value
    }

    /// Lower bound.
    pub fn min(&self) -> f64 {
        self.min
    }

    /// Upper bound.
    pub fn max(&self) -> f64 {
        self.max
    }

    /// Snap increment; `0` disables snapping.
    pub fn step(&self) -> f64 {
        self.step
    }

    /// Clamp `v` to the bounds and snap it to the step grid.
    pub fn constrain(&self, v: f64) -> f64 {
        snap(v, self.min, self.max, self.step)
    }

    /// Register a listener that sees `(name, current, proposed)` before a change.
    pub fn on_pre_change(
        &mut self,
        listener: impl FnMut(&str, f64, f64) -> OptionChange + Send + 'static,
    ) {
        self.pre_change.push(Box::new(listener));
    }

    /// Register a listener that sees `(name, new_value)` after a change.
    pub fn on_change(&mut self, listener: impl FnMut(&str, f64) + Send + 'static) {
        self.on_change.push(Box::new(listener));
    }

    /// Propose a new value. Returns whether the stored value changed.
    pub fn set_value(&mut self, proposed: f64) -> StrataResult<bool> {
        if proposed.is_nan() {
            return Err(StrataError::validation(format!(
                "option '{}' value must be a number",
                self.name
            )));
        }
        let mut next = self.constrain(proposed);
        for listener in &mut self.pre_change {
            match listener(&self.name, self.value, next) {
                OptionChange::Accept => {}
                OptionChange::Adjust(v) if !v.is_nan() => {
                    next = snap(v, self.min, self.max, self.step);
                }
                OptionChange::Adjust(_) | OptionChange::Cancel => return Ok(false),
            }
        }
        if next == self.value {
            return Ok(false);
        }
        self.value = next;
        for listener in &mut self.on_change {
            listener(&self.name, next);
        }
        Ok(true)
    }
}

fn snap(v: f64, min: f64, max: f64, step: f64) -> f64 {
    let v = v.clamp(min, max);
    if step == 0.0 {
        return v;
    }
    (min + ((v - min) / step).round() * step).min(max)
}

impl std::fmt::Debug for NumericOption {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NumericOption")
            .field("name", &self.name)
            .field("value", &self.value)
            .field("min", &self.min)
            .field("max", &self.max)
            .field("step", &self.step)
            .field("listeners", &(self.pre_change.len() + self.on_change.len()))
            .finish()
    }
}

/// Named collection of options, in insertion order.
#[derive(Debug, Default)]
pub struct OptionSet {
    options: Vec<NumericOption>,
}

impl OptionSet {
    /// Empty set.
    pub fn new() -> Self {
        Self::default()
    }

    /// One option per filter parameter.
    pub fn from_filter(filter: &dyn Filter) -> StrataResult<Self> {
        let mut set = Self::new();
        for param in filter.params() {
            set.insert(NumericOption::from_param(&param)?);
        }
        Ok(set)
    }

    /// Add an option, replacing any option with the same name.
    pub fn insert(&mut self, option: NumericOption) {
        match self.options.iter_mut().find(|o| o.name == option.name) {
            Some(slot) => *slot = option,
            None => self.options.push(option),
        }
    }

    /// Option by name.
    pub fn get(&self, name: &str) -> Option<&NumericOption> {
        self.options.iter().find(|o| o.name == name)
    }

    /// Mutable option by name, e.g. to attach listeners.
    pub fn get_mut(&mut self, name: &str) -> Option<&mut NumericOption> {
        self.options.iter_mut().find(|o| o.name == name)
    }

    /// Current value of `name`.
    pub fn value(&self, name: &str) -> Option<f64> {
        self.get(name).map(NumericOption::value)
    }

    /// Propose a value for `name`; see [`NumericOption::set_value`].
    pub fn set(&mut self, name: &str, value: f64) -> StrataResult<bool> {
        self.get_mut(name)
            .ok_or_else(|| StrataError::not_found(format!("no option named '{name}'")))?
            .set_value(value)
    }

    /// Options in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &NumericOption> {
        self.options.iter()
    }

    /// Number of options.
    pub fn len(&self) -> usize {
        self.options.len()
    }

    /// Whether the set is empty.
    pub fn is_empty(&self) -> bool {
        self.options.is_empty()
    }

    /// Push every option whose value differs from the filter's current
    /// parameter back through [`Filter::set_param`].
    pub fn apply_to(&self, filter: &mut dyn Filter) -> StrataResult<()> {
        let current = filter.params();
        for param in current {
            let Some(value) = self.value(&param.name) else {
                continue;
            };
            if value != param.value {
                filter.set_param(&param.name, value)?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "../tests/unit/options/options.rs"]
mod tests;
