//! Fan PWM driver with a timer-paced fade channel.
//!
//! ## Hardware
//!
//! LEDC channel 0 drives a low-side MOSFET. The fade channel is an
//! `esp_timer` that plays one buffered duty per period; after the last step
//! it calls [`FadeSignal::on_transfer_complete`], which stops the timer and
//! writes the exact target.
//!
//! ## Dual-target design
//!
//! On ESP-IDF the timer task drives [`FadeChannel::tick`]. On host/test
//! there is no timer; [`FanPwm::sim_step`] stands in for one period and the
//! last written duty is observable through [`FanPwm::duty`].

use core::sync::atomic::{AtomicBool, AtomicU8, AtomicUsize, Ordering};

use crate::app::ports::FanPort;
use crate::control::fan::{FADE_STEPS, FadeSignal};
use crate::error::ActuatorError;

#[cfg(target_os = "espidf")]
use crate::drivers::hw_init::{self, HwInitError};
#[cfg(target_os = "espidf")]
use esp_idf_svc::sys::*;

// ── Fade channel ──────────────────────────────────────────────

/// Outcome of one fade-timer period.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FadeTick {
    Idle,
    Step(u8),
    Finished,
}

/// Step buffer shared between the main loop (loads it) and the fade timer
/// (plays it). Lives in a `static` on target.
pub struct FadeChannel {
    steps: [AtomicU8; FADE_STEPS],
    len: AtomicUsize,
    pos: AtomicUsize,
    active: AtomicBool,
    signal: &'static FadeSignal,
    #[cfg(target_os = "espidf")]
    timer: core::sync::atomic::AtomicPtr<esp_timer>,
}

impl FadeChannel {
    pub const fn new(signal: &'static FadeSignal) -> Self {
        Self {
            steps: [const { AtomicU8::new(0) }; FADE_STEPS],
            len: AtomicUsize::new(0),
            pos: AtomicUsize::new(0),
            active: AtomicBool::new(false),
            signal,
            #[cfg(target_os = "espidf")]
            timer: core::sync::atomic::AtomicPtr::new(core::ptr::null_mut()),
        }
    }

    pub fn is_active(&self) -> bool {
        self.active.load(Ordering::Acquire)
    }

    fn load(&self, steps: &[u8]) -> Result<(), ActuatorError> {
        if self.is_active() {
            return Err(ActuatorError::FadeChannelBusy);
        }
        if steps.is_empty() || steps.len() > FADE_STEPS {
            return Err(ActuatorError::FadeDispatchFailed);
        }
        for (slot, &duty) in self.steps.iter().zip(steps) {
            slot.store(duty, Ordering::Relaxed);
        }
        self.len.store(steps.len(), Ordering::Relaxed);
        self.pos.store(0, Ordering::Relaxed);
        self.active.store(true, Ordering::Release);
        Ok(())
    }

    fn halt(&self) {
        self.active.store(false, Ordering::Release);
    }

    fn advance(&self) -> FadeTick {
        if !self.is_active() {
            return FadeTick::Idle;
        }
        let pos = self.pos.load(Ordering::Relaxed);
        if pos >= self.len.load(Ordering::Relaxed) {
            return FadeTick::Finished;
        }
        self.pos.store(pos + 1, Ordering::Relaxed);
        FadeTick::Step(self.steps[pos].load(Ordering::Relaxed))
    }

    /// One fade-timer period: emit the next step, or hand completion to the
    /// [`FadeSignal`] once the buffer is exhausted.
    pub fn tick(&self, port: &mut impl FanPort) -> FadeTick {
        let tick = self.advance();
        match tick {
            FadeTick::Idle => {}
            FadeTick::Step(duty) => port.write_duty(duty),
            FadeTick::Finished => self.signal.on_transfer_complete(port),
        }
        tick
    }
}

// ── Driver ────────────────────────────────────────────────────

pub struct FanPwm {
    channel: u32,
    fade: &'static FadeChannel,
    #[cfg(not(target_os = "espidf"))]
    duty: u8,
}

#[cfg(target_os = "espidf")]
unsafe extern "C" fn fade_timer_cb(arg: *mut core::ffi::c_void) {
    // SAFETY: `arg` is the `&'static FadeChannel` registered in `FanPwm::new`.
    let fade = unsafe { &*(arg as *const FadeChannel) };
    let mut port = FanPwm {
        channel: hw_init::LEDC_CH_FAN,
        fade,
    };
    fade.tick(&mut port);
}

impl FanPwm {
    /// Create the fade timer. Failure leaves the channel uninitialised and
    /// every level change falls back to a direct write.
    #[cfg(target_os = "espidf")]
    pub fn new(channel: u32, fade: &'static FadeChannel) -> Self {
        let args = esp_timer_create_args_t {
            callback: Some(fade_timer_cb),
            arg: fade as *const FadeChannel as *mut core::ffi::c_void,
            dispatch_method: esp_timer_dispatch_t_ESP_TIMER_TASK,
            name: c"fan_fade".as_ptr(),
            skip_unhandled_events: true,
        };
        let mut handle: esp_timer_handle_t = core::ptr::null_mut();
        // SAFETY: `args` outlives the call; `fade` is 'static so the callback
        // argument stays valid for the life of the timer.
        let ret = unsafe { esp_timer_create(&args, &mut handle) };
        if ret == ESP_OK as i32 {
            fade.timer.store(handle, Ordering::Release);
            log::info!("fan_pwm: fade timer ready ({} steps)", FADE_STEPS);
        } else {
            log::warn!("fan_pwm: {}, fades disabled", HwInitError::FadeTimerFailed(ret));
        }
        Self { channel, fade }
    }

    #[cfg(not(target_os = "espidf"))]
    pub fn new(channel: u32, fade: &'static FadeChannel) -> Self {
        Self {
            channel,
            fade,
            duty: 0,
        }
    }

    /// Play one fade period (host simulation of the timer callback).
    #[cfg(not(target_os = "espidf"))]
    pub fn sim_step(&mut self) -> FadeTick {
        let fade = self.fade;
        fade.tick(self)
    }

    /// Last duty written to the simulated output.
    #[cfg(not(target_os = "espidf"))]
    pub fn duty(&self) -> u8 {
        self.duty
    }

    pub fn channel(&self) -> u32 {
        self.channel
    }
}

impl FanPort for FanPwm {
    #[cfg(target_os = "espidf")]
    fn write_duty(&mut self, duty: u8) {
        hw_init::ledc_set(self.channel, duty);
    }

    #[cfg(not(target_os = "espidf"))]
    fn write_duty(&mut self, duty: u8) {
        self.duty = duty;
    }

    #[cfg(target_os = "espidf")]
    fn fade_ready(&self) -> bool {
        !self.fade.timer.load(Ordering::Acquire).is_null() && !self.fade.is_active()
    }

    #[cfg(not(target_os = "espidf"))]
    fn fade_ready(&self) -> bool {
        !self.fade.is_active()
    }

    fn start_fade(&mut self, steps: &[u8]) -> Result<(), ActuatorError> {
        self.fade.load(steps)?;

        #[cfg(target_os = "espidf")]
        {
            let timer = self.fade.timer.load(Ordering::Acquire);
            if timer.is_null() {
                self.fade.halt();
                return Err(ActuatorError::FadeChannelUnavailable);
            }
            // SAFETY: `timer` was created in `new` and is never deleted.
            let ret = unsafe { esp_timer_start_periodic(timer, crate::pins::FAN_FADE_STEP_US) };
            if ret != ESP_OK as i32 {
                self.fade.halt();
                return Err(ActuatorError::FadeDispatchFailed);
            }
        }

        Ok(())
    }

    fn stop_fade(&mut self) {
        self.fade.halt();

        #[cfg(target_os = "espidf")]
        {
            let timer = self.fade.timer.load(Ordering::Acquire);
            if !timer.is_null() {
                // SAFETY: valid handle; stopping an idle timer only returns
                // ESP_ERR_INVALID_STATE, which is fine here.
                unsafe { esp_timer_stop(timer) };
            }
        }
    }
}
