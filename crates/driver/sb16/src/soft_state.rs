//! Per-device soft state and the bring-up sequence.
//!
//! [`Sb16::bring_up`] walks the phases of [`Phase`] strictly in order. Each
//! step runs only after the previous one succeeded; a fatal failure from
//! [`Phase::HandlerBound`] onward rolls back the interrupt registration (and
//! anything exposed so far) before the error is returned.
//!
//! State machine:
//! `Init → ResourcesQueried → ResourcesClassified → ProgramBuilt → HandlerBound
//! → InterruptsEnabled → PrimaryReady → (SecondaryReady | SecondarySkipped) → Up`,
//! with `Failed` reachable from every state but `Up`.

use alloc::vec::Vec;

use ddf_api::{
    DeviceHandle, DriverError, FunctionHandle, FunctionRegistry, InterruptDispatch, IrqLine, IrqNotification,
    ProbeContext, ResourceAuthority,
};

use crate::config::Sb16Config;
use crate::error::{BringUpError, Phase, Sb16Error};
use crate::irq::{InterruptBinder, STATUS_SLOT, build_irq_code};
use crate::regs::MixerIrqStatus;
use crate::resources::{DeviceResources, enable_interrupts, query_resources};
use crate::unit::{FunctionalUnit, UnitInitializer, UnitKind};

fn at(phase: Phase) -> impl FnOnce(Sb16Error) -> BringUpError {
    move |cause| BringUpError::new(phase, cause)
}

/// Registration status of the device's interrupt handler.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HandlerStatus {
    /// No program registered.
    Unregistered,
    /// Program registered, line not yet enabled by the parent.
    Registered,
    /// Program registered and line enabled.
    InterruptsEnabled,
}

/// Where a device stands in its bring-up.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BringUpState {
    /// The given phase was the last one completed.
    Reached(Phase),
    /// Bring-up stopped; everything acquired has been released.
    Failed(BringUpError),
}

impl BringUpState {
    /// Returns `true` once the device is fully operational.
    #[must_use]
    pub const fn is_up(&self) -> bool {
        matches!(self, Self::Reached(Phase::Up))
    }
}

/// Soft state of one SB16 instance.
///
/// `P` and `S` are the primary (DSP) and secondary (MPU-401) unit types.
pub struct Sb16<P, S> {
    device: DeviceHandle,
    state: BringUpState,
    phases: Vec<Phase>,
    handler: HandlerStatus,
    binder: InterruptBinder,
    resources: Option<DeviceResources>,
    pcm: Option<P>,
    pcm_function: Option<FunctionHandle>,
    midi: Option<(S, FunctionHandle)>,
    interrupts: u64,
}

impl<P, S> Sb16<P, S> {
    /// Creates the soft state of `device`, with nothing acquired yet.
    #[must_use]
    pub fn new(device: DeviceHandle) -> Self {
        Self {
            device,
            state: BringUpState::Reached(Phase::Init),
            phases: Vec::new(),
            handler: HandlerStatus::Unregistered,
            binder: InterruptBinder::new(),
            resources: None,
            pcm: None,
            pcm_function: None,
            midi: None,
            interrupts: 0,
        }
    }

    /// Returns the device-manager handle of this instance.
    #[must_use]
    pub fn device(&self) -> DeviceHandle {
        self.device
    }

    /// Returns the current bring-up state.
    #[must_use]
    pub fn state(&self) -> BringUpState {
        self.state
    }

    /// Returns every phase completed so far, in order.
    #[must_use]
    pub fn phases(&self) -> &[Phase] {
        &self.phases
    }

    /// Returns the interrupt handler status.
    #[must_use]
    pub fn handler_status(&self) -> HandlerStatus {
        self.handler
    }

    /// Returns the IRQ line currently bound, if any.
    #[must_use]
    pub fn bound_irq(&self) -> Option<IrqLine> {
        self.binder.bound()
    }

    /// Returns the classified resources once known.
    #[must_use]
    pub fn resources(&self) -> Option<&DeviceResources> {
        self.resources.as_ref()
    }

    /// Returns the DSP unit, if initialized.
    #[must_use]
    pub fn primary(&self) -> Option<&P> {
        self.pcm.as_ref()
    }

    /// Returns the MPU-401 unit, if initialized and exposed.
    #[must_use]
    pub fn secondary(&self) -> Option<&S> {
        self.midi.as_ref().map(|(unit, _)| unit)
    }

    /// Returns the exposed function of a unit.
    #[must_use]
    pub fn function(&self, kind: UnitKind) -> Option<FunctionHandle> {
        match kind {
            UnitKind::Primary => self.pcm_function,
            UnitKind::Secondary => self.midi.as_ref().map(|&(_, fun)| fun),
        }
    }

    /// Returns the number of interrupts delivered to the bottom half.
    #[must_use]
    pub fn interrupt_count(&self) -> u64 {
        self.interrupts
    }

    fn advance(&mut self, phase: Phase) {
        log::debug!(target: "sb16", "device {}: {phase:?}", self.device.0);
        self.phases.push(phase);
        self.state = BringUpState::Reached(phase);
    }

    /// Unexposes functions, drops units and releases the interrupt line.
    fn release<D, F>(&mut self, dispatch: &mut D, functions: &mut F)
    where
        D: InterruptDispatch,
        F: FunctionRegistry,
    {
        if let Some(fun) = self.pcm_function.take() {
            functions.unexpose(fun);
        }
        if let Some((_, fun)) = self.midi.take() {
            functions.unexpose(fun);
        }
        self.pcm = None;
        if let Some(irq) = self.binder.bound() {
            self.binder.unbind(dispatch, irq);
        }
        self.handler = HandlerStatus::Unregistered;
    }

    /// Tears the device down after a successful bring-up.
    ///
    /// Unexposes both functions, drops the units and unbinds the interrupt
    /// line. The soft state returns to [`Phase::Init`].
    pub fn teardown<A, D, F>(&mut self, ctx: &mut ProbeContext<'_, A, D, F>)
    where
        A: ResourceAuthority,
        D: InterruptDispatch,
        F: FunctionRegistry,
    {
        self.release(ctx.dispatch, ctx.functions);
        self.resources = None;
        self.phases.clear();
        self.state = BringUpState::Reached(Phase::Init);
        log::info!(target: "sb16", "device {} removed", self.device.0);
    }
}

impl<P, S> Sb16<P, S>
where
    P: FunctionalUnit,
    S: FunctionalUnit,
{
    /// Brings the device up.
    ///
    /// On success the state is `Up`, the interrupt program is installed and
    /// enabled, the DSP is exposed as [`Sb16Config::pcm_function`] and, if
    /// it came up, the MPU-401 as [`Sb16Config::midi_function`].
    ///
    /// A failing MPU-401 is logged as a warning and bring-up continues
    /// without it.
    ///
    /// # Errors
    ///
    /// Returns the phase and cause of the first fatal failure. By then the
    /// interrupt line has been unbound and nothing stays exposed.
    ///
    /// Bring-up runs once per soft state. Calling it again, after success or
    /// failure, returns [`Sb16Error::HandlerRegistrationFailed`] with
    /// [`DriverError::AlreadyExists`] at the current phase and changes
    /// nothing. A context built for another device is refused with
    /// [`Sb16Error::WrongDevice`].
    pub fn bring_up<A, D, F, U>(
        &mut self,
        ctx: &mut ProbeContext<'_, A, D, F>,
        units: &mut U,
        config: &Sb16Config,
    ) -> Result<(), BringUpError>
    where
        A: ResourceAuthority,
        D: InterruptDispatch,
        F: FunctionRegistry,
        U: UnitInitializer<Primary = P, Secondary = S>,
    {
        if ctx.device != self.device {
            let err = BringUpError::new(Phase::Init, Sb16Error::WrongDevice(ctx.device));
            log::error!(target: "sb16", "device {}: {err}", self.device.0);
            return Err(err);
        }
        let current = match self.state {
            BringUpState::Reached(Phase::Init) => None,
            BringUpState::Reached(phase) => Some(phase),
            BringUpState::Failed(err) => Some(err.phase),
        };
        if let Some(phase) = current {
            log::error!(
                target: "sb16",
                "device {}: bring-up already ran, now at {phase:?}",
                self.device.0
            );
            return Err(BringUpError::new(
                phase,
                Sb16Error::HandlerRegistrationFailed(DriverError::AlreadyExists),
            ));
        }

        match self.run_phases(ctx, units, config) {
            Ok(()) => {
                log::info!(
                    target: "sb16",
                    "device {} up on {:?}, midi {}",
                    self.device.0,
                    self.resources.map(|res| res.primary),
                    if self.midi.is_some() { "bound" } else { "absent" },
                );
                Ok(())
            }
            Err(err) => {
                log::error!(target: "sb16", "device {}: {err}", self.device.0);
                // Nothing is registered on our behalf before the bind succeeds.
                if err.phase > Phase::HandlerBound {
                    log::error!(target: "sb16", "device {}: rolling back irq handler", self.device.0);
                    self.release(ctx.dispatch, ctx.functions);
                }
                self.state = BringUpState::Failed(err);
                Err(err)
            }
        }
    }

    fn run_phases<A, D, F, U>(
        &mut self,
        ctx: &mut ProbeContext<'_, A, D, F>,
        units: &mut U,
        config: &Sb16Config,
    ) -> Result<(), BringUpError>
    where
        A: ResourceAuthority,
        D: InterruptDispatch,
        F: FunctionRegistry,
        U: UnitInitializer<Primary = P, Secondary = S>,
    {
        let raw = query_resources(ctx.authority, self.device).map_err(at(Phase::ResourcesQueried))?;
        self.advance(Phase::ResourcesQueried);

        let res = DeviceResources::classify(&raw)
            .map_err(|e| BringUpError::new(Phase::ResourcesClassified, e.into()))?;
        self.resources = Some(res);
        self.advance(Phase::ResourcesClassified);

        let code = build_irq_code(&res);
        self.advance(Phase::ProgramBuilt);

        self.binder
            .bind(ctx.dispatch, self.device, res.irq, &code)
            .map_err(at(Phase::HandlerBound))?;
        self.handler = HandlerStatus::Registered;
        self.advance(Phase::HandlerBound);

        enable_interrupts(ctx.authority, self.device).map_err(at(Phase::InterruptsEnabled))?;
        self.handler = HandlerStatus::InterruptsEnabled;
        self.advance(Phase::InterruptsEnabled);

        let pcm = units
            .init_primary(&res)
            .map_err(|e| BringUpError::new(Phase::PrimaryReady, Sb16Error::PrimaryUnitInitFailed(e)))?;
        self.pcm = Some(pcm);
        self.advance(Phase::PrimaryReady);

        if config.enable_midi {
            match self.init_midi(ctx.functions, units, config, &res) {
                Ok(()) => self.advance(Phase::SecondaryReady),
                Err(err) => {
                    log::warn!(target: "sb16", "device {}: {err}", self.device.0);
                    self.advance(Phase::SecondarySkipped);
                }
            }
        } else {
            log::info!(target: "sb16", "device {}: mpu disabled by configuration", self.device.0);
            self.advance(Phase::SecondarySkipped);
        }

        let expose_failed = |e| BringUpError::new(Phase::Up, Sb16Error::FunctionExposeFailed(e));
        let fun = ctx
            .functions
            .expose(self.device, &config.pcm_function)
            .map_err(expose_failed)?;
        self.pcm_function = Some(fun);
        ctx.functions
            .add_to_category(fun, &config.pcm_category)
            .map_err(expose_failed)?;
        self.advance(Phase::Up);
        Ok(())
    }

    fn init_midi<F, U>(
        &mut self,
        functions: &mut F,
        units: &mut U,
        config: &Sb16Config,
        res: &DeviceResources,
    ) -> Result<(), Sb16Error>
    where
        F: FunctionRegistry,
        U: UnitInitializer<Primary = P, Secondary = S>,
    {
        let midi = units
            .init_secondary(res)
            .map_err(Sb16Error::SecondaryUnitInitFailed)?;
        let fun = functions
            .expose(self.device, &config.midi_function)
            .map_err(Sb16Error::SecondaryUnitInitFailed)?;
        self.midi = Some((midi, fun));
        Ok(())
    }

    /// Bottom half: runs after the interrupt program accepted an interrupt.
    ///
    /// Decodes the mixer status latched by the program. An MPU-401 event is
    /// forwarded to the MIDI unit; DMA events, or a status with no source
    /// bit at all, go to the DSP. Returns whether any unit was notified.
    pub fn handle_interrupt(&mut self, notification: &IrqNotification) -> bool {
        if !self.state.is_up() {
            log::debug!(
                target: "sb16",
                "device {}: interrupt before bring-up completed",
                self.device.0
            );
            return false;
        }
        self.interrupts += 1;

        let status =
            MixerIrqStatus::from_bits_truncate(notification.scratch[STATUS_SLOT].to_le_bytes()[0]);
        let mut handled = false;

        if status.contains(MixerIrqStatus::MPU401) {
            match self.midi.as_mut() {
                Some((midi, _)) => {
                    midi.handle_interrupt();
                    handled = true;
                }
                None => log::debug!(target: "sb16", "device {}: stray mpu interrupt", self.device.0),
            }
        }
        if status.intersects(MixerIrqStatus::DMA8 | MixerIrqStatus::DMA16)
            || !status.contains(MixerIrqStatus::MPU401)
        {
            if let Some(pcm) = self.pcm.as_mut() {
                pcm.handle_interrupt();
                handled = true;
            }
        }
        handled
    }
}
