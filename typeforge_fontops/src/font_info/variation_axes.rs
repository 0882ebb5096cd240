use crate::{font_info::RegisteredAxis, sfnt::tag_to_string};
use hb_subset::{
    sys::{
        hb_face_t, hb_ot_name_get_utf8, hb_ot_name_id_t,
        hb_ot_var_axis_flags_t_HB_OT_VAR_AXIS_FLAG_HIDDEN, hb_ot_var_axis_info_t,
        hb_ot_var_get_axis_count, hb_ot_var_get_axis_infos, hb_ot_var_get_named_instance_count,
        hb_ot_var_named_instance_get_design_coords,
        hb_ot_var_named_instance_get_subfamily_name_id, hb_tag_t,
    },
    FontFace,
};
use std::{ffi::c_uint, ops::RangeInclusive, ptr};

#[derive(Clone, Debug)]
pub struct VariationAxis {
    pub name: String,
    pub tag: hb_tag_t,
    pub range: RangeInclusive<f32>,
    pub default: f32,
    pub is_hidden: bool,
}
impl VariationAxis {
    pub fn tag_name(&self) -> String {
        tag_to_string(self.tag)
    }

    pub fn registered(&self) -> Option<RegisteredAxis> {
        RegisteredAxis::from_tag(&self.tag_name())
    }

    /// Whether the axis range is valid for its registered axis. Returns `None` for custom axes.
    pub fn is_valid(&self) -> Option<bool> {
        self.registered().map(|axis| axis.is_valid(&self.range))
    }
}

/// A named instance of a variable font, such as `Bold` or `Condensed Light`.
#[derive(Clone, Debug, PartialEq)]
pub struct NamedInstance {
    pub name: String,
    /// Design coordinates, keyed by axis tag.
    pub coordinates: Vec<(String, f32)>,
}

pub(crate) unsafe fn load_string(face: *mut hb_face_t, name: hb_ot_name_id_t) -> String {
    let full_len = hb_ot_name_get_utf8(face, name, ptr::null(), &mut 0, ptr::null_mut());
    if full_len == 0 {
        return String::new();
    }

    let mut buf = vec![0u8; full_len as usize + 1];
    let mut size = buf.len() as c_uint;
    hb_ot_name_get_utf8(face, name, ptr::null(), &mut size, buf.as_mut_ptr() as *mut _);
    buf.truncate(size as usize);
    String::from_utf8_lossy(&buf).to_string()
}
unsafe fn load_axis_info(face: *mut hb_face_t, axis: hb_ot_var_axis_info_t) -> VariationAxis {
    let mut name = load_string(face, axis.name_id);
    if name.is_empty() {
        if let Some(registered) = RegisteredAxis::from_tag(&tag_to_string(axis.tag)) {
            name = registered.standard_name().to_string();
        }
    }
    VariationAxis {
        name,
        tag: axis.tag,
        range: axis.min_value..=axis.max_value,
        default: axis.default_value,
        is_hidden: (axis.flags & hb_ot_var_axis_flags_t_HB_OT_VAR_AXIS_FLAG_HIDDEN) != 0,
    }
}

pub fn get_variation_axes(face: &FontFace) -> Vec<VariationAxis> {
    unsafe {
        let face = face.as_raw();

        let count = hb_ot_var_get_axis_count(face) as usize;
        if count == 0 {
            Vec::new()
        } else {
            let mut data = vec![
                hb_ot_var_axis_info_t {
                    axis_index: 0,
                    tag: 0,
                    name_id: hb_ot_name_id_t(0),
                    flags: 0,
                    min_value: 0.0,
                    default_value: 0.0,
                    max_value: 0.0,
                    reserved: 0,
                };
                count
            ];

            let mut ct_var = count as c_uint;
            hb_ot_var_get_axis_infos(face, 0, &mut ct_var, data.as_mut_ptr());
            data.truncate(ct_var as usize);

            data.into_iter()
                .map(|axis| load_axis_info(face, axis))
                .collect()
        }
    }
}

pub fn get_named_instances(face: &FontFace, axes: &[VariationAxis]) -> Vec<NamedInstance> {
    unsafe {
        let face = face.as_raw();

        let count = hb_ot_var_get_named_instance_count(face);
        let mut instances = Vec::new();
        for idx in 0..count {
            let name_id = hb_ot_var_named_instance_get_subfamily_name_id(face, idx);
            let mut coords = vec![0.0f32; axes.len()];
            let mut len = coords.len() as c_uint;
            hb_ot_var_named_instance_get_design_coords(face, idx, &mut len, coords.as_mut_ptr());
            coords.truncate(len as usize);

            instances.push(NamedInstance {
                name: load_string(face, name_id),
                coordinates: axes
                    .iter()
                    .zip(coords)
                    .map(|(axis, value)| (axis.tag_name(), value))
                    .collect(),
            });
        }
        instances
    }
}
