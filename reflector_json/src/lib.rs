use reflector::*;
use std::error::Error;

pub use serde_json;

/// `try_into` followed by `array::try_map`, which is still unstable
pub fn json_array_to_float_array<const D: usize>(
    json_array: &[serde_json::Value],
) -> Option<[Float; D]> {
    let array: &[serde_json::Value; D] = json_array.try_into().ok()?;

    let mut coords = [0.; D];
    for (coord, value) in coords.iter_mut().zip(array) {
        *coord = value.as_f64()? as Float;
    }
    Some(coords)
}

pub fn json_array_to_vector(json_array: &[serde_json::Value]) -> Option<Vector> {
    json_array_to_float_array::<2>(json_array).map(Vector::from)
}

pub fn map_json_array<C: FromIterator<T>, T>(
    json: &serde_json::Value,
    map: impl FnMut(&serde_json::Value) -> Result<T, Box<dyn Error>>,
) -> Result<C, Box<dyn Error>> {
    json.as_array()
        .ok_or("json value must be an array")?
        .iter()
        .map(map)
        .collect()
}

fn get_vector(json: &serde_json::Value, key: &str) -> Result<Vector, Box<dyn Error>> {
    let array = json
        .get(key)
        .and_then(serde_json::Value::as_array)
        .ok_or_else(|| format!("missing {key}"))?;

    json_array_to_vector(array).ok_or_else(|| format!("{key} must be an array of 2 numbers").into())
}

fn get_float(json: &serde_json::Value, key: &str) -> Result<Option<Float>, Box<dyn Error>> {
    json.get(key)
        .map(|value| {
            value
                .as_f64()
                .ok_or_else(|| format!("{key} must be a number").into())
        })
        .transpose()
}

pub trait JsonSer {
    /// Serialize `self` into a JSON object.
    fn to_json(&self) -> serde_json::Value;
}

impl<T: JsonSer> JsonSer for [T] {
    fn to_json(&self) -> serde_json::Value {
        serde_json::Value::Array(Vec::from_iter(self.iter().map(T::to_json)))
    }
}

impl<T: JsonSer> JsonSer for Vec<T> {
    fn to_json(&self) -> serde_json::Value {
        self.as_slice().to_json()
    }
}

impl<T: JsonSer + ?Sized> JsonSer for &T {
    fn to_json(&self) -> serde_json::Value {
        (*self).to_json()
    }
}

pub trait JsonDes {
    /// Deserialize from a JSON object.
    ///
    /// Returns an error if `json`'s format or values are invalid.
    fn from_json(json: &serde_json::Value) -> Result<Self, Box<dyn Error>>
    where
        Self: Sized;
}

impl<T: JsonDes> JsonDes for Vec<T> {
    fn from_json(json: &serde_json::Value) -> Result<Self, Box<dyn Error>> {
        map_json_array(json, T::from_json)
    }
}

impl JsonSer for Ray {
    /// Serialize a ray into a JSON object.
    ///
    /// The format of the returned object is explained in [`Self::from_json`]
    fn to_json(&self) -> serde_json::Value {
        serde_json::json!({
            "origin": self.origin.as_slice(),
            "direction": self.direction.as_slice(),
        })
    }
}

impl JsonDes for Ray {
    /// Deserialize a new ray from a JSON object.
    ///
    /// The JSON object must follow the following format:
    ///
    /// ```json
    /// {
    ///     "origin": [9., 8.],
    ///     "direction": [9., 8.], // not normalized, may be zero
    /// }
    /// ```
    fn from_json(json: &serde_json::Value) -> Result<Self, Box<dyn Error>> {
        Ok(Self::new(
            get_vector(json, "origin")?,
            get_vector(json, "direction")?,
        ))
    }
}

fn reflection_mode_name(mode: ReflectionMode) -> &'static str {
    match mode {
        ReflectionMode::Inherited => "inherited",
        ReflectionMode::UnitNormal => "unit_normal",
    }
}

fn stale_beam_policy_name(policy: StaleBeamPolicy) -> &'static str {
    match policy {
        StaleBeamPolicy::Ignore => "ignore",
        StaleBeamPolicy::Recreate => "recreate",
    }
}

impl JsonSer for BeamStyle {
    fn to_json(&self) -> serde_json::Value {
        serde_json::json!({
            "color": self.color,
            "line_width": self.line_width,
        })
    }
}

/// Reads the fields present in `json` over `base`.
fn merge_beam_style(
    json: &serde_json::Value,
    mut base: BeamStyle,
) -> Result<BeamStyle, Box<dyn Error>> {
    if let Some(color) = json.get("color") {
        base.color = color
            .as_array()
            .map(Vec::as_slice)
            .and_then(json_array_to_float_array::<4>)
            .ok_or("color must be an array of 4 numbers")?
            .map(|c| c as f32);
    }

    if let Some(line_width) = get_float(json, "line_width")? {
        base.line_width = line_width;
    }

    Ok(base)
}

impl JsonDes for BeamStyle {
    /// Deserialize a beam style from a JSON object.
    ///
    /// ```json
    /// {
    ///     "color": [0., 0., 1., 1.], // RGBA, optional
    ///     "line_width": 5., // optional
    /// }
    /// ```
    fn from_json(json: &serde_json::Value) -> Result<Self, Box<dyn Error>> {
        merge_beam_style(json, BeamStyle::default())
    }
}

impl JsonSer for ReflectorConfig {
    fn to_json(&self) -> serde_json::Value {
        serde_json::json!({
            "reflection_mode": reflection_mode_name(self.reflection_mode),
            "stale_beam_policy": stale_beam_policy_name(self.stale_beam_policy),
            "touch_margin": self.touch_margin,
            "beam_style": self.beam_style.to_json(),
        })
    }
}

/// Reads the fields present in `json` over `base`, leaving the others untouched.
pub fn merge_config(
    json: &serde_json::Value,
    mut base: ReflectorConfig,
) -> Result<ReflectorConfig, Box<dyn Error>> {
    if let Some(mode) = json.get("reflection_mode") {
        base.reflection_mode = match mode.as_str() {
            Some("inherited") => ReflectionMode::Inherited,
            Some("unit_normal") => ReflectionMode::UnitNormal,
            _ => return Err(r#"reflection_mode must be "inherited" or "unit_normal""#.into()),
        };
    }

    if let Some(policy) = json.get("stale_beam_policy") {
        base.stale_beam_policy = match policy.as_str() {
            Some("ignore") => StaleBeamPolicy::Ignore,
            Some("recreate") => StaleBeamPolicy::Recreate,
            _ => return Err(r#"stale_beam_policy must be "ignore" or "recreate""#.into()),
        };
    }

    if let Some(touch_margin) = get_float(json, "touch_margin")? {
        base.touch_margin = touch_margin;
    }

    if let Some(style) = json.get("beam_style") {
        base.beam_style = merge_beam_style(style, base.beam_style)?;
    }

    Ok(base)
}

impl JsonDes for ReflectorConfig {
    /// Deserialize a mirror configuration from a JSON object.
    ///
    /// Every field is optional and defaults to [`ReflectorConfig::default`]:
    ///
    /// ```json
    /// {
    ///     "reflection_mode": "inherited", // or "unit_normal"
    ///     "stale_beam_policy": "ignore", // or "recreate"
    ///     "touch_margin": 30.,
    ///     "beam_style": { "color": [0., 0., 1., 1.], "line_width": 5. },
    /// }
    /// ```
    fn from_json(json: &serde_json::Value) -> Result<Self, Box<dyn Error>> {
        merge_config(json, ReflectorConfig::default())
    }
}

impl JsonSer for MirrorReflector {
    /// Serialize a mirror's layout into a JSON object. Its reflecting state is not saved.
    fn to_json(&self) -> serde_json::Value {
        serde_json::json!({
            "center": self.center().as_slice(),
            "size": self.size().as_slice(),
            "rotation": self.rotation(),
            "config": self.config().to_json(),
        })
    }
}

/// Deserialize a mirror, whose `"config"` fields, if any, override those of `base`.
pub fn mirror_from_json(
    json: &serde_json::Value,
    base: ReflectorConfig,
) -> Result<MirrorReflector, Box<dyn Error>> {
    let center = get_vector(json, "center")?;

    let size = get_vector(json, "size")?;
    if size.iter().any(|c| !c.is_finite() || *c < 0.) {
        return Err("size must be finite and non-negative".into());
    }

    let rotation = get_float(json, "rotation")?.unwrap_or(0.);

    let config = match json.get("config") {
        Some(config) => merge_config(config, base)?,
        None => base,
    };

    Ok(MirrorReflector::new(center, size)
        .with_rotation(rotation)
        .with_config(config))
}

impl JsonDes for MirrorReflector {
    /// Deserialize a new mirror from a JSON object.
    ///
    /// ```json
    /// {
    ///     "center": [0., 0.],
    ///     "size": [10., 80.], // width, height
    ///     "rotation": 0.5, // radians, optional
    ///     "config": { ... }, // optional, see `ReflectorConfig::from_json`
    /// }
    /// ```
    fn from_json(json: &serde_json::Value) -> Result<Self, Box<dyn Error>> {
        mirror_from_json(json, ReflectorConfig::default())
    }
}

impl JsonSer for LightBeam {
    fn to_json(&self) -> serde_json::Value {
        serde_json::json!({
            "id": self.id().to_string(),
            "origin": self.origin.as_slice(),
            "direction": self.direction.as_slice(),
            "style": self.style.to_json(),
        })
    }
}

impl JsonDes for LightBeam {
    /// Deserialize a beam from a JSON object.
    ///
    /// ```json
    /// {
    ///     "id": "67e55044-10b1-426f-9247-bb680e5fe0c8",
    ///     "origin": [0., 0.],
    ///     "direction": [1., 0.],
    ///     "style": { ... }, // optional
    /// }
    /// ```
    fn from_json(json: &serde_json::Value) -> Result<Self, Box<dyn Error>> {
        let id: BeamId = json
            .get("id")
            .and_then(serde_json::Value::as_str)
            .ok_or("missing beam id")?
            .parse()?;

        let style = json
            .get("style")
            .map(BeamStyle::from_json)
            .transpose()?
            .unwrap_or_default();

        Ok(
            Self::with_id(id, get_vector(json, "origin")?, get_vector(json, "direction")?)
                .with_style(style),
        )
    }
}

impl JsonSer for BeamSet {
    fn to_json(&self) -> serde_json::Value {
        self.as_slice().to_json()
    }
}

impl JsonDes for BeamSet {
    fn from_json(json: &serde_json::Value) -> Result<Self, Box<dyn Error>> {
        map_json_array(json, LightBeam::from_json)
    }
}

impl JsonSer for IncidenceEvent {
    fn to_json(&self) -> serde_json::Value {
        serde_json::json!({
            "mirror": self.mirror,
            "ray": self.ray.to_json(),
        })
    }
}

impl JsonDes for IncidenceEvent {
    /// ```json
    /// {
    ///     "mirror": 0, // index in the puzzle's mirror list
    ///     "ray": { ... },
    /// }
    /// ```
    fn from_json(json: &serde_json::Value) -> Result<Self, Box<dyn Error>> {
        let mirror: usize = json
            .get("mirror")
            .and_then(serde_json::Value::as_u64)
            .ok_or("mirror must be a non-negative integer")?
            .try_into()?;

        let ray = Ray::from_json(json.get("ray").ok_or("missing ray")?)?;

        Ok(Self::new(mirror, ray))
    }
}

pub fn serialize_puzzle(puzzle: &Puzzle) -> serde_json::Value {
    serde_json::json!({
        "mirrors": puzzle.mirrors.to_json(),
        "events": puzzle.events.to_json(),
    })
}

/// Deserialize a whole puzzle.
///
/// ```json
/// {
///     "config": { ... }, // optional, shared by all mirrors
///     "mirrors": [ ... ],
///     "events": [ ... ], // optional
/// }
/// ```
///
/// Fails if an event targets a mirror that doesn't exist.
pub fn deserialize_puzzle(json: &serde_json::Value) -> Result<Puzzle, Box<dyn Error>> {
    let config = json
        .get("config")
        .map(ReflectorConfig::from_json)
        .transpose()?
        .unwrap_or_default();

    let mirrors = map_json_array(
        json.get("mirrors").ok_or("mirrors field expected")?,
        |value| mirror_from_json(value, config),
    )?;

    let events = json
        .get("events")
        .map(Vec::<IncidenceEvent>::from_json)
        .transpose()?
        .unwrap_or_default();

    let puzzle = Puzzle::new(mirrors, events);
    puzzle.validate()?;

    Ok(puzzle)
}
