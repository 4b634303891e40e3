export![
    framebuffer,
    index_buffer,
    readback_buffer,
    shader,
    texture,
    vertex_array
];
