use js_sys::Function;
use serde::de::DeserializeOwned;
use serde_wasm_bindgen as swb;
use wasm_bindgen::prelude::*;

use haus_carousel_core::{
    Carousel, CarouselError, Config, Measurements, MoveOptions, Outputs, PointerInput,
    TouchInput, Tunables, WheelInput,
};

#[wasm_bindgen]
pub struct HausCarousel {
    core: Carousel,
}

fn jsvalue_is_undefined_or_null(v: &JsValue) -> bool {
    v.is_undefined() || v.is_null()
}

fn parse<T: DeserializeOwned>(value: JsValue, what: &str) -> Result<T, JsError> {
    swb::from_value(value).map_err(|e| JsError::new(&format!("{what} parse error: {e}")))
}

fn parse_or_default<T: DeserializeOwned + Default>(value: JsValue, what: &str) -> Result<T, JsError> {
    if jsvalue_is_undefined_or_null(&value) {
        Ok(T::default())
    } else {
        parse(value, what)
    }
}

fn engine_error(op: &str, e: CarouselError) -> JsError {
    JsError::new(&format!("{op} error: {e}"))
}

fn outputs_to_js(out: &Outputs) -> Result<JsValue, JsError> {
    swb::to_value(out).map_err(|e| JsError::new(&format!("outputs error: {e}")))
}

/// Reads CSS custom properties through a JS callback
/// `lookup(name: string) -> string | null | undefined`.
struct JsPropertyLookup {
    f: Function,
}

impl JsPropertyLookup {
    fn get(&self, name: &str) -> Option<String> {
        let arg = JsValue::from_str(name);
        match self.f.call1(&JsValue::UNDEFINED, &arg) {
            Ok(val) => {
                if let Some(s) = val.as_string() {
                    return Some(s);
                }
                // numbers are accepted as unitless lengths
                val.as_f64().map(|n| n.to_string())
            }
            Err(_) => None,
        }
    }
}

#[wasm_bindgen]
impl HausCarousel {
    /// Create a carousel. Pass a config object or undefined/null for defaults.
    /// Example:
    ///   new HausCarousel({ align: "center", damping: 250 })
    #[wasm_bindgen(constructor)]
    pub fn new(config: JsValue) -> Result<HausCarousel, JsError> {
        console_error_panic_hook::set_once();
        let cfg: Config = parse_or_default(config, "config")?;
        Ok(HausCarousel {
            core: Carousel::new(cfg),
        })
    }

    /// Create a carousel from a JSON config string.
    #[wasm_bindgen(js_name = fromJson)]
    pub fn from_json(config_json: &str) -> Result<HausCarousel, JsError> {
        console_error_panic_hook::set_once();
        let cfg: Config = serde_json::from_str(config_json)
            .map_err(|e| JsError::new(&format!("config error: {e}")))?;
        Ok(HausCarousel {
            core: Carousel::new(cfg),
        })
    }

    /// Apply measurements `{ container_size, item_sizes }` and typed tunables.
    #[wasm_bindgen]
    pub fn refresh(
        &mut self,
        measurements: JsValue,
        tunables: JsValue,
        now: f64,
    ) -> Result<JsValue, JsError> {
        let measurements: Measurements = parse(measurements, "measurements")?;
        let tunables: Tunables = parse_or_default(tunables, "tunables")?;
        let out = self
            .core
            .refresh(measurements, tunables, now)
            .map_err(|e| engine_error("refresh", e))?;
        outputs_to_js(out)
    }

    /// Like `refresh`, reading tunables from CSS custom properties through
    /// `lookup(name)` (e.g. `name => getComputedStyle(el).getPropertyValue(name)`).
    #[wasm_bindgen(js_name = refreshFromStyle)]
    pub fn refresh_from_style(
        &mut self,
        measurements: JsValue,
        lookup: Function,
        now: f64,
    ) -> Result<JsValue, JsError> {
        let measurements: Measurements = parse(measurements, "measurements")?;
        let lookup = JsPropertyLookup { f: lookup };
        let tunables =
            Tunables::from_custom_properties(measurements.container_size, |name| lookup.get(name));
        let out = self
            .core
            .refresh(measurements, tunables, now)
            .map_err(|e| engine_error("refresh", e))?;
        outputs_to_js(out)
    }

    /// Ease item `index` into view. `options` is `{ easing?, duration? }` or undefined.
    #[wasm_bindgen(js_name = moveIntoView)]
    pub fn move_into_view(
        &mut self,
        index: u32,
        options: JsValue,
        now: f64,
    ) -> Result<JsValue, JsError> {
        let options: MoveOptions = parse_or_default(options, "move options")?;
        let out = self
            .core
            .move_into_view(index as usize, options, now)
            .map_err(|e| engine_error("move_into_view", e))?;
        outputs_to_js(out)
    }

    /// Advance animations to `now` (ms, e.g. the rAF timestamp).
    #[wasm_bindgen]
    pub fn update(&mut self, now: f64) -> Result<JsValue, JsError> {
        let out = self
            .core
            .update(now)
            .map_err(|e| engine_error("update", e))?;
        outputs_to_js(out)
    }

    #[wasm_bindgen(js_name = pointerDown)]
    pub fn pointer_down(&mut self, input: JsValue) -> Result<JsValue, JsError> {
        let input: PointerInput = parse(input, "pointer")?;
        let out = self
            .core
            .pointer_down(input)
            .map_err(|e| engine_error("pointer_down", e))?;
        outputs_to_js(out)
    }

    #[wasm_bindgen(js_name = pointerMove)]
    pub fn pointer_move(&mut self, input: JsValue) -> Result<JsValue, JsError> {
        let input: PointerInput = parse(input, "pointer")?;
        let out = self
            .core
            .pointer_move(input)
            .map_err(|e| engine_error("pointer_move", e))?;
        outputs_to_js(out)
    }

    #[wasm_bindgen(js_name = pointerUp)]
    pub fn pointer_up(&mut self, input: JsValue) -> Result<JsValue, JsError> {
        let input: PointerInput = parse(input, "pointer")?;
        let out = self
            .core
            .pointer_up(input)
            .map_err(|e| engine_error("pointer_up", e))?;
        outputs_to_js(out)
    }

    #[wasm_bindgen(js_name = pointerCancel)]
    pub fn pointer_cancel(&mut self, input: JsValue) -> Result<JsValue, JsError> {
        let input: PointerInput = parse(input, "pointer")?;
        let out = self
            .core
            .pointer_cancel(input)
            .map_err(|e| engine_error("pointer_cancel", e))?;
        outputs_to_js(out)
    }

    /// Returns `{ prevent_default, outputs }`.
    #[wasm_bindgen]
    pub fn wheel(&mut self, input: JsValue) -> Result<JsValue, JsError> {
        let input: WheelInput = parse(input, "wheel")?;
        let response = self
            .core
            .wheel(input)
            .map_err(|e| engine_error("wheel", e))?;
        swb::to_value(&response).map_err(|e| JsError::new(&format!("wheel response error: {e}")))
    }

    /// True when the host must `preventDefault()` the touchstart.
    #[wasm_bindgen(js_name = touchStart)]
    pub fn touch_start(&self, input: JsValue) -> Result<bool, JsError> {
        let input: TouchInput = parse(input, "touch")?;
        Ok(self.core.touch_start(input))
    }

    /// True when the host must `preventDefault()` the touchmove.
    #[wasm_bindgen(js_name = touchMove)]
    pub fn touch_move(&self, cancelable: bool) -> bool {
        self.core.touch_move(cancelable)
    }

    /// True when the click trails a drag and must be swallowed.
    #[wasm_bindgen]
    pub fn click(&self) -> bool {
        self.core.click()
    }

    #[wasm_bindgen(js_name = stopAllAnimations)]
    pub fn stop_all_animations(&mut self) {
        self.core.stop_all_animations();
    }

    #[wasm_bindgen]
    pub fn unmount(&mut self) -> Result<JsValue, JsError> {
        outputs_to_js(self.core.unmount())
    }

    #[wasm_bindgen(getter, js_name = activeIndex)]
    pub fn active_index(&self) -> u32 {
        self.core.active_index() as u32
    }

    #[wasm_bindgen(getter)]
    pub fn offset(&self) -> f64 {
        self.core.offset()
    }

    /// Snapshot `{ active_index, offset, motion, visible, listeners, disabled }`.
    #[wasm_bindgen]
    pub fn state(&self) -> Result<JsValue, JsError> {
        swb::to_value(&self.core.state()).map_err(|e| JsError::new(&format!("state error: {e}")))
    }

    /// `{ start, end }` of item `index` in container coordinates.
    #[wasm_bindgen(js_name = itemPosition)]
    pub fn item_position(&self, index: u32) -> Result<JsValue, JsError> {
        swb::to_value(&self.core.item_position(index as usize))
            .map_err(|e| JsError::new(&format!("item_position error: {e}")))
    }

    /// `{ index, distance }` of the boundary closest to `offset + requested`.
    #[wasm_bindgen(js_name = findSnapDistance)]
    pub fn find_snap_distance(&self, requested: f64) -> Result<JsValue, JsError> {
        swb::to_value(&self.core.find_snap_distance(requested))
            .map_err(|e| JsError::new(&format!("find_snap_distance error: {e}")))
    }
}

/// Numeric ABI version for compatibility checks at init.
#[wasm_bindgen]
pub fn abi_version() -> u32 {
    1
}
