//! Scriptable capability for tests.
//!
//! [`ProbeCapability`] records every hook invocation in a shared
//! [`ProbeState`] and reads its activation predicates from switches on that
//! same state, so a test can flip predicates after handing the probe to a
//! manager.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use crate::capability::{Capability, CapabilityClass, CapabilityContext, BASE_CAPABILITY};
use crate::component::ComponentStore;

pub static PROBE: CapabilityClass = CapabilityClass::new("Probe", Some(&BASE_CAPABILITY), new_probe);
pub static DERIVED_PROBE: CapabilityClass =
    CapabilityClass::new("DerivedProbe", Some(&PROBE), new_derived_probe);
pub static OTHER_PROBE: CapabilityClass =
    CapabilityClass::new("OtherProbe", Some(&BASE_CAPABILITY), new_other_probe);

fn new_probe() -> Box<dyn Capability> {
    Box::new(ProbeCapability::new(ProbeState::new()))
}

fn new_derived_probe() -> Box<dyn Capability> {
    Box::new(ProbeCapability::new(ProbeState::new()).with_class(&DERIVED_PROBE))
}

fn new_other_probe() -> Box<dyn Capability> {
    Box::new(ProbeCapability::new(ProbeState::new()).with_class(&OTHER_PROBE))
}

/// Ordered record of hook invocations shared by several probes.
pub type EventLog = Rc<RefCell<Vec<String>>>;

pub fn event_log() -> EventLog {
    Rc::new(RefCell::new(Vec::new()))
}

pub type ProbeHook = Box<dyn FnMut(&mut CapabilityContext<'_>)>;

/// Predicate switches and hook counters shared between a probe and its test.
#[derive(Debug)]
pub struct ProbeState {
    should_be_active: Cell<bool>,
    should_activate: Cell<bool>,
    should_deactivate: Cell<bool>,
    activations: Cell<u32>,
    deactivations: Cell<u32>,
    updates: Cell<u32>,
    evaluations: Cell<u32>,
    last_delta: Cell<f32>,
}

impl Default for ProbeState {
    fn default() -> Self {
        Self {
            should_be_active: Cell::new(true),
            should_activate: Cell::new(true),
            should_deactivate: Cell::new(false),
            activations: Cell::new(0),
            deactivations: Cell::new(0),
            updates: Cell::new(0),
            evaluations: Cell::new(0),
            last_delta: Cell::new(0.0),
        }
    }
}

impl ProbeState {
    pub fn new() -> Rc<Self> {
        Rc::new(Self::default())
    }

    pub fn set_should_be_active(&self, value: bool) {
        self.should_be_active.set(value);
    }

    pub fn set_should_activate(&self, value: bool) {
        self.should_activate.set(value);
    }

    pub fn set_should_deactivate(&self, value: bool) {
        self.should_deactivate.set(value);
    }

    pub fn activations(&self) -> u32 {
        self.activations.get()
    }

    pub fn deactivations(&self) -> u32 {
        self.deactivations.get()
    }

    pub fn updates(&self) -> u32 {
        self.updates.get()
    }

    /// Number of times `should_be_active` was consulted, i.e. how many
    /// activation evaluations included this probe.
    pub fn evaluations(&self) -> u32 {
        self.evaluations.get()
    }

    pub fn last_delta(&self) -> f32 {
        self.last_delta.get()
    }
}

pub struct ProbeCapability {
    class: &'static CapabilityClass,
    label: &'static str,
    priority: i32,
    start_active: bool,
    state: Rc<ProbeState>,
    log: Option<EventLog>,
    activated_hook: Option<ProbeHook>,
    deactivated_hook: Option<ProbeHook>,
    update_hook: Option<ProbeHook>,
}

impl ProbeCapability {
    pub fn new(state: Rc<ProbeState>) -> Self {
        Self {
            class: &PROBE,
            label: "probe",
            priority: 0,
            start_active: false,
            state,
            log: None,
            activated_hook: None,
            deactivated_hook: None,
            update_hook: None,
        }
    }

    pub fn with_class(mut self, class: &'static CapabilityClass) -> Self {
        self.class = class;
        self
    }

    pub fn with_priority(mut self, priority: i32) -> Self {
        self.priority = priority;
        self
    }

    pub fn with_start_active(mut self, start_active: bool) -> Self {
        self.start_active = start_active;
        self
    }

    /// Record hook invocations as `"{label}:{hook}"` in `log`.
    pub fn logging(mut self, label: &'static str, log: &EventLog) -> Self {
        self.label = label;
        self.log = Some(Rc::clone(log));
        self
    }

    pub fn on_activated(mut self, hook: impl FnMut(&mut CapabilityContext<'_>) + 'static) -> Self {
        self.activated_hook = Some(Box::new(hook));
        self
    }

    pub fn on_deactivated(mut self, hook: impl FnMut(&mut CapabilityContext<'_>) + 'static) -> Self {
        self.deactivated_hook = Some(Box::new(hook));
        self
    }

    pub fn on_update(mut self, hook: impl FnMut(&mut CapabilityContext<'_>) + 'static) -> Self {
        self.update_hook = Some(Box::new(hook));
        self
    }

    pub fn label(&self) -> &'static str {
        self.label
    }

    pub fn state(&self) -> &Rc<ProbeState> {
        &self.state
    }

    fn record(&self, hook: &str) {
        if let Some(log) = &self.log {
            log.borrow_mut().push(format!("{}:{}", self.label, hook));
        }
    }
}

impl Capability for ProbeCapability {
    fn class(&self) -> &'static CapabilityClass {
        self.class
    }

    fn initial_priority(&self) -> i32 {
        self.priority
    }

    fn start_active(&self) -> bool {
        self.start_active
    }

    fn should_be_active(&self, _components: &ComponentStore) -> bool {
        self.state.evaluations.set(self.state.evaluations.get() + 1);
        self.state.should_be_active.get()
    }

    fn should_activate(&self, _components: &ComponentStore) -> bool {
        self.state.should_activate.get()
    }

    fn should_deactivate(&self, _components: &ComponentStore) -> bool {
        self.state.should_deactivate.get()
    }

    fn on_activated(&mut self, ctx: &mut CapabilityContext<'_>) {
        self.state.activations.set(self.state.activations.get() + 1);
        self.record("activated");
        if let Some(hook) = self.activated_hook.as_mut() {
            hook(ctx);
        }
    }

    fn on_deactivated(&mut self, ctx: &mut CapabilityContext<'_>) {
        self.state.deactivations.set(self.state.deactivations.get() + 1);
        self.record("deactivated");
        if let Some(hook) = self.deactivated_hook.as_mut() {
            hook(ctx);
        }
    }

    fn update(&mut self, delta_time: f32, ctx: &mut CapabilityContext<'_>) {
        self.state.updates.set(self.state.updates.get() + 1);
        self.state.last_delta.set(delta_time);
        self.record("update");
        if let Some(hook) = self.update_hook.as_mut() {
            hook(ctx);
        }
    }
}
