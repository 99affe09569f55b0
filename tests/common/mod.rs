//! Tiny ONNX models encoded by hand, so the binary can be driven end to end
//! without shipping a trained network.

#![allow(dead_code)]

use std::path::{Path, PathBuf};

pub const INPUT_DIMS: [i64; 4] = [1, 224, 224, 3];

const FLOAT: u64 = 1;
const ATTR_INT: u64 = 2;
const ATTR_INTS: u64 = 7;

fn varint(mut v: u64, out: &mut Vec<u8>) {
    loop {
        let byte = (v & 0x7f) as u8;
        v >>= 7;
        if v == 0 {
            out.push(byte);
            return;
        }
        out.push(byte | 0x80);
    }
}

fn int_field(field: u64, v: i64, out: &mut Vec<u8>) {
    varint(field << 3, out);
    varint(v as u64, out);
}

fn bytes_field(field: u64, data: &[u8], out: &mut Vec<u8>) {
    varint((field << 3) | 2, out);
    varint(data.len() as u64, out);
    out.extend_from_slice(data);
}

fn value_info(name: &str, dims: &[i64]) -> Vec<u8> {
    let mut shape = Vec::new();
    for &d in dims {
        let mut dim = Vec::new();
        int_field(1, d, &mut dim);
        bytes_field(1, &dim, &mut shape);
    }

    let mut tensor_type = Vec::new();
    int_field(1, FLOAT as i64, &mut tensor_type);
    bytes_field(2, &shape, &mut tensor_type);

    let mut type_proto = Vec::new();
    bytes_field(1, &tensor_type, &mut type_proto);

    let mut info = Vec::new();
    bytes_field(1, name.as_bytes(), &mut info);
    bytes_field(2, &type_proto, &mut info);
    info
}

fn ints_attr(name: &str, values: &[i64]) -> Vec<u8> {
    let mut attr = Vec::new();
    bytes_field(1, name.as_bytes(), &mut attr);
    for &v in values {
        int_field(8, v, &mut attr);
    }
    int_field(20, ATTR_INTS as i64, &mut attr);
    attr
}

fn int_attr(name: &str, value: i64) -> Vec<u8> {
    let mut attr = Vec::new();
    bytes_field(1, name.as_bytes(), &mut attr);
    int_field(3, value, &mut attr);
    int_field(20, ATTR_INT as i64, &mut attr);
    attr
}

fn node(op_type: &str, inputs: &[&str], output: &str, attributes: &[Vec<u8>]) -> Vec<u8> {
    let mut node = Vec::new();
    for input in inputs {
        bytes_field(1, input.as_bytes(), &mut node);
    }
    bytes_field(2, output.as_bytes(), &mut node);
    bytes_field(4, op_type.as_bytes(), &mut node);
    for attr in attributes {
        bytes_field(5, attr, &mut node);
    }
    node
}

fn float_initializer(name: &str, dims: &[i64], values: &[f32]) -> Vec<u8> {
    let mut tensor = Vec::new();
    for &d in dims {
        int_field(1, d, &mut tensor);
    }
    int_field(2, FLOAT as i64, &mut tensor);
    bytes_field(8, name.as_bytes(), &mut tensor);
    let raw: Vec<u8> = values.iter().flat_map(|v| v.to_le_bytes()).collect();
    bytes_field(9, &raw, &mut tensor);
    tensor
}

fn model(nodes: &[Vec<u8>], initializers: &[Vec<u8>], output_dims: &[i64]) -> Vec<u8> {
    let mut graph = Vec::new();
    for n in nodes {
        bytes_field(1, n, &mut graph);
    }
    bytes_field(2, b"test", &mut graph);
    for init in initializers {
        bytes_field(5, init, &mut graph);
    }
    bytes_field(11, &value_info("x", &INPUT_DIMS), &mut graph);
    bytes_field(12, &value_info("y", output_dims), &mut graph);

    let mut opset = Vec::new();
    int_field(2, 13, &mut opset);

    let mut model = Vec::new();
    int_field(1, 8, &mut model);
    bytes_field(2, b"lung-predict-tests", &mut model);
    bytes_field(7, &graph, &mut model);
    bytes_field(8, &opset, &mut model);
    model
}

/// Scores each colour channel by its brightest pixel: 1x224x224x3 -> 1x3.
pub fn channel_max_model() -> Vec<u8> {
    let reduce = node(
        "ReduceMax",
        &["x"],
        "y",
        &[ints_attr("axes", &[1, 2]), int_attr("keepdims", 0)],
    );
    model(&[reduce], &[], &[1, 3])
}

/// Passes the input through unchanged, so the output is not 1xC.
pub fn identity_model() -> Vec<u8> {
    model(&[node("Identity", &["x"], "y", &[])], &[], &INPUT_DIMS)
}

/// Adds a 5-channel bias, which cannot broadcast against a 3-channel image.
pub fn five_channel_model() -> Vec<u8> {
    let bias = float_initializer("bias", &[1, 1, 1, 5], &[0.0; 5]);
    model(
        &[node("Add", &["x", "bias"], "y", &[])],
        &[bias],
        &[1, 224, 224, 5],
    )
}

pub fn write_model(dir: &Path, name: &str, bytes: &[u8]) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, bytes).unwrap();
    path
}

pub fn write_solid_png(dir: &Path, name: &str, width: u32, height: u32, rgb: [u8; 3]) -> PathBuf {
    let path = dir.join(name);
    image::RgbImage::from_pixel(width, height, image::Rgb(rgb))
        .save(&path)
        .unwrap();
    path
}

pub fn write_gradient_png(dir: &Path, name: &str, width: u32, height: u32) -> PathBuf {
    let path = dir.join(name);
    image::RgbImage::from_fn(width, height, |x, y| {
        image::Rgb([(x % 256) as u8, (y % 256) as u8, ((x + y) % 256) as u8])
    })
    .save(&path)
    .unwrap();
    path
}

/// Parse the first report line, e.g. `[[10, 200, 30]]`.
pub fn parse_scores(line: &str) -> Vec<f32> {
    line.trim_start_matches('[')
        .trim_end_matches(']')
        .split(',')
        .map(|s| s.trim().parse().unwrap())
        .collect()
}
