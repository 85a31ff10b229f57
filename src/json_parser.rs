/*

    Provide utilities to parse fit request JSON files.

    This format currently assumes:
        - Numbers may be given as strings, e.g. "_id": "1" or "_id": 1
        - Vertex data is a single string of whitespace separated floats,
          read three at a time

    @date: 2 Oct, 2025
    @author: bartu
*/

use std::fmt::{self};
use std::marker::PhantomData;
use std::str::FromStr;
use std::fs::File;
use std::io::BufReader;
use std::error::Error;

use serde::{Deserialize, Deserializer};
use serde::de::{self, Visitor, MapAccess};

use crate::json_structs::{FitRequest, RootRequest, Transformations, TransformKind};
use crate::numeric::{Float, Matrix4, Vector3};
use tracing::{debug, warn};

pub fn parse_request(path: &str) -> Result<FitRequest, Box<dyn Error>> {

    let span = tracing::span!(tracing::Level::INFO, "load_request");
    let _enter = span.enter();

    // Open file
    let file = File::open(path)?;
    let reader = BufReader::new(file);
    debug!("Reading file from {}", path);

    let root: RootRequest = serde_json::from_reader(reader)?;
    Ok(root.request)
}


pub(crate) fn deser_usize<'de, D>(deserializer: D) -> Result<usize, D::Error>
where
    D: Deserializer<'de>,
{
    // Deserialize usize type given as either string or number in JSON
    let s: serde_json::Value = Deserialize::deserialize(deserializer)?;
    match s {
        serde_json::Value::Number(n) => n.as_u64()
            .map(|v| v as usize)
            .ok_or_else(|| de::Error::custom("Invalid non-negative integer")),
        serde_json::Value::String(s) => s.trim().parse::<usize>()
            .map_err(|_| de::Error::custom("Failed to parse integer from string")),
        t => Err(de::Error::custom(format!("Expected int or string, found {:#?}", t))),
    }
}

pub(crate) fn deser_numeric_vec<'de, D, N>(deserializer: D) -> Result<Vec<N>, D::Error>
where
    D: serde::Deserializer<'de>,
    N: FromStr,
    N::Err: fmt::Display,
{
    // Deserialize string of numbers separated by whitespace
    // into a vector of numbers, e.g. "0 2 3" in .json is deserialized
    // to Vec<N> where N is number-like. Plain arrays like [0, 2, "3"] work too.
    let parse = |x: &str| x.trim().parse::<N>().map_err(de::Error::custom);

    let value: serde_json::Value = Deserialize::deserialize(deserializer)?;
    match value {
        serde_json::Value::String(s) => s.split_whitespace().map(parse).collect(),
        serde_json::Value::Array(items) => items
            .iter()
            .map(|item| match item {
                serde_json::Value::Number(n) => parse(&n.to_string()),
                serde_json::Value::String(s) => parse(s),
                t => Err(de::Error::custom(format!("Expected number, found {}", t))),
            })
            .collect(),
        t => Err(de::Error::custom(format!("Expected string or array of numbers, found {}", t))),
    }
}


// Wrapper for deser_numeric_vec<Float>
pub(crate) fn deser_float_vec<'de, D>(deserializer: D) -> Result<Vec<Float>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    deser_numeric_vec::<D, Float>(deserializer)
}


// Wrapper for deser_numeric_vec<usize>
pub(crate) fn deser_usize_vec<'de, D>(deserializer: D) -> Result<Vec<usize>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    deser_numeric_vec::<D, usize>(deserializer)
}

pub(crate) fn deser_opt_usize_vec<'de, D>(deserializer: D) -> Result<Option<Vec<usize>>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    // null or missing means no restriction
    #[derive(Deserialize)]
    struct Wrapper(#[serde(deserialize_with = "deser_usize_vec")] Vec<usize>);

    let opt = Option::<Wrapper>::deserialize(deserializer)?;
    Ok(opt.map(|Wrapper(v)| v))
}


pub fn deser_vertex_data<'de, D>(deserializer: D) -> Result<Vec<Vector3>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let s: String = Deserialize::deserialize(deserializer)?;
    parse_string_vecvec3(&s).map_err(serde::de::Error::custom)
}

pub fn parse_string_vecvec3(s: &str) -> Result<Vec<Vector3>, String> {
    parse_string_vec(s, 3, |chunk| Ok(Vector3::new(chunk[0], chunk[1], chunk[2])))
}


fn parse_string_vec<T, F>(s: &str, chunk_len: usize, mut f: F) -> Result<Vec<T>, String>
where
    F: FnMut(&[Float]) -> Result<T, String>,
{
    let nums: Vec<Float> = s
        .split_whitespace()
        .map(|x| x.parse::<Float>().map_err(|e| e.to_string()))
        .collect::<Result<_, _>>()?;

    if nums.len() % chunk_len != 0 {
        return Err(format!("Input length not divisible by {}", chunk_len));
    }

    nums.chunks(chunk_len)
        .map(|chunk| f(chunk))
        .collect::<Result<Vec<_>, _>>()
}


// Adapted from https://serde.rs/string-or-struct.html
// with a fallible FromStr, a malformed string is a deserialization error
pub fn deser_string_or_struct<'de, T, D>(deserializer: D) -> Result<T, D::Error>
where
    T: Deserialize<'de> + FromStr,
    T::Err: fmt::Display,
    D: Deserializer<'de>,
{
    // Forwards string types to T's `FromStr` impl and map types to
    // T's `Deserialize` impl.
    struct StringOrStruct<T>(PhantomData<fn() -> T>);

    impl<'de, T> Visitor<'de> for StringOrStruct<T>
    where
        T: Deserialize<'de> + FromStr,
        T::Err: fmt::Display,
    {
        type Value = T;

        fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
            formatter.write_str("string or map")
        }

        fn visit_str<E>(self, value: &str) -> Result<T, E>
        where
            E: de::Error,
        {
            T::from_str(value).map_err(de::Error::custom)
        }

        fn visit_map<M>(self, map: M) -> Result<T, M::Error>
        where
            M: MapAccess<'de>,
        {
            Deserialize::deserialize(de::value::MapAccessDeserializer::new(map))
        }
    }

    deserializer.deserialize_any(StringOrStruct(PhantomData))
}


/// Compose a matrix from an expression such as "t1 r2 s1".
/// Tokens are applied left to right, each one on top of the previous.
pub fn parse_transform_expression(
    expr: &str,
    global_transforms: &Transformations
) -> Matrix4 {

    let mut out = Matrix4::IDENTITY;

    for token in expr.split_whitespace() {
        debug!("Parsing token {}", token);
        let (kind, id_str) = match (token.get(..1), token.get(1..)) {
            (Some(kind), Some(id_str)) if !id_str.is_empty() => (kind, id_str),
            _ => {
                warn!("Malformed transformation token '{}', skipping...", token);
                continue;
            }
        };
        let id: usize = match id_str.parse() {
            Ok(n) => n,
            Err(_) => {
                warn!("Invalid transformation id in '{}'", token);
                continue;
            }
        };

        let found = match kind {
            "t" | "T" => global_transforms.find_translation(id).map(|f| f.get_mat4(TransformKind::Translation)),
            "s" | "S" => global_transforms.find_scaling(id).map(|f| f.get_mat4(TransformKind::Scaling)),
            "r" | "R" => global_transforms.find_rotation(id).map(|f| f.get_mat4(TransformKind::Rotation)),
            "c" | "C" => global_transforms.find_composite(id).map(|f| f.get_mat4(TransformKind::Composite)),
            _ => {
                warn!("Unknown transform token '{}'", kind);
                continue;
            }
        };

        match found {
            Some(mat) => {
                out = mat * out;
                debug!("After '{}': {}", token, out);
            }
            None => warn!("Transformation '{}' not found, skipping...", token),
        }
    }

    out
}


#[cfg(test)]
mod tests {
    use super::*;
    use crate::json_structs::TransformField;
    use crate::numeric::{approx_eq_vec, transform_point};

    #[derive(Deserialize)]
    struct Probe {
        #[serde(deserialize_with = "deser_usize")]
        n: usize,
        #[serde(default, deserialize_with = "deser_opt_usize_vec")]
        sel: Option<Vec<usize>>,
    }

    #[test]
    fn test_numbers_as_strings_or_values() {
        let a: Probe = serde_json::from_str(r#"{"n": "7", "sel": "0 4 2"}"#).unwrap();
        let b: Probe = serde_json::from_str(r#"{"n": 7}"#).unwrap();
        assert_eq!(a.n, b.n);
        assert_eq!(a.sel, Some(vec![0, 4, 2]));
        assert_eq!(b.sel, None);
        assert!(serde_json::from_str::<Probe>(r#"{"n": -1}"#).is_err());
        assert!(serde_json::from_str::<Probe>(r#"{"n": 1, "sel": "0 x"}"#).is_err());

        let c: Probe = serde_json::from_str(r#"{"n": 0, "sel": [0, "4", 2]}"#).unwrap();
        assert_eq!(c.sel, Some(vec![0, 4, 2]));
        assert!(serde_json::from_str::<Probe>(r#"{"n": 0, "sel": [1.5]}"#).is_err());
    }

    #[test]
    fn test_vertex_data_string() {
        let verts = parse_string_vecvec3("0 0 0  1 2 3").unwrap();
        assert_eq!(verts, vec![Vector3::ZERO, Vector3::new(1., 2., 3.)]);
        assert!(parse_string_vecvec3("0 0 0 1").is_err());
    }

    #[test]
    fn test_transform_expression_order() {
        let transforms = Transformations {
            translations: crate::json_structs::SingleOrVec::Single(TransformField { _id: 1, _data: vec![1., 0., 0.] }),
            scalings: crate::json_structs::SingleOrVec::Single(TransformField { _id: 1, _data: vec![2., 2., 2.] }),
            ..Default::default()
        };
        // Translate first, then scale
        let mat = parse_transform_expression("t1 s1", &transforms);
        assert!(approx_eq_vec(&transform_point(&mat, &Vector3::ZERO), &Vector3::new(2., 0., 0.)));

        // Unknown ids and tokens are skipped
        let mat = parse_transform_expression("t9 x1 s", &transforms);
        assert_eq!(mat, Matrix4::IDENTITY);
    }
}
